pub mod catalog;
pub mod engagement;
pub mod media;
pub mod sessions;

pub use catalog::CatalogService;
pub use engagement::EngagementService;
pub use media::{MediaKind, MediaStore, StoredFile};
pub use sessions::SessionService;
