pub mod session_gate;

pub use session_gate::{AdminUser, Capability, CurrentUser, GateRejection};
