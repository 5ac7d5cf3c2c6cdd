/// Media store - filesystem persistence for uploaded videos and posters
///
/// Files are stored under a generated opaque key, never under the
/// client-supplied filename; the original name travels only as display
/// metadata. Keys are a UUID plus a sanitized extension, so a stored key can
/// never escape its directory or collide with another upload.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::MediaConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Poster,
}

/// Result of persisting an upload
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Opaque storage key, usable in /videos/{key} and /posters/{key}
    pub key: String,
    /// Client-supplied filename, display metadata only
    pub original_name: String,
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    video_dir: PathBuf,
    poster_dir: PathBuf,
}

impl MediaStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            video_dir: PathBuf::from(&config.video_dir),
            poster_dir: PathBuf::from(&config.poster_dir),
        }
    }

    /// Create the storage directories if they do not exist yet
    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.video_dir)?;
        fs::create_dir_all(&self.poster_dir)?;
        Ok(())
    }

    fn dir(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Video => &self.video_dir,
            MediaKind::Poster => &self.poster_dir,
        }
    }

    /// Persist a fully-buffered upload under a fresh opaque key
    pub fn store(&self, kind: MediaKind, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        let key = format!("{}{}", Uuid::new_v4(), key_extension(original_name));
        fs::write(self.dir(kind).join(&key), bytes)?;

        Ok(StoredFile {
            key,
            original_name: original_name.to_string(),
        })
    }

    /// Read a stored file back by its key. Keys that do not have the
    /// generated shape resolve to not-found, same as missing files.
    pub fn fetch(&self, kind: MediaKind, key: &str) -> Result<Vec<u8>> {
        if !is_valid_key(key) {
            return Err(AppError::NotFound(format!("file {} not found", key)));
        }

        match fs::read(self.dir(kind).join(key)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("file {} not found", key)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Sanitized extension carried over from the original filename, including the
/// leading dot; empty when the original has no usable extension
fn key_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

/// A storage key is a single path component: UUID, dashes, one extension
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && !key.contains("..")
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

/// Admin upload policy: the movie file must carry a .mp4 suffix. The generic
/// /upload endpoint deliberately skips this check (two distinct policies).
pub fn has_mp4_suffix(name: &str) -> bool {
    name.ends_with(".mp4")
}

/// Content type for serving a stored key back
pub fn content_type_for(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediaConfig;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, MediaStore) {
        let dir = TempDir::new().unwrap();
        let config = MediaConfig {
            video_dir: dir.path().join("movies").to_string_lossy().into_owned(),
            poster_dir: dir.path().join("posters").to_string_lossy().into_owned(),
        };
        let store = MediaStore::new(&config);
        store.ensure_dirs().unwrap();
        (dir, store)
    }

    #[test]
    fn store_then_fetch_is_byte_identical() {
        let (_dir, store) = temp_store();
        let bytes = b"\x00\x00\x00\x18ftypmp42 fake video payload";

        let stored = store.store(MediaKind::Video, "My Movie.MP4", bytes).unwrap();
        assert!(stored.key.ends_with(".mp4"));
        assert_eq!(stored.original_name, "My Movie.MP4");

        let fetched = store.fetch(MediaKind::Video, &stored.key).unwrap();
        assert_eq!(fetched, bytes);
    }

    #[test]
    fn key_is_opaque_and_unique() {
        let (_dir, store) = temp_store();
        let first = store.store(MediaKind::Video, "clip.mp4", b"a").unwrap();
        let second = store.store(MediaKind::Video, "clip.mp4", b"b").unwrap();

        assert_ne!(first.key, second.key);
        assert!(!first.key.contains("clip"));
    }

    #[test]
    fn fetch_unknown_key_is_not_found() {
        let (_dir, store) = temp_store();
        let err = store
            .fetch(MediaKind::Video, "11111111-2222-3333-4444-555555555555.mp4")
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn traversal_shaped_keys_are_rejected() {
        let (_dir, store) = temp_store();
        for key in ["../secret", "a/b.mp4", "..", "\\windows", ""] {
            assert!(!is_valid_key(key), "key {:?} should be invalid", key);
            assert!(store.fetch(MediaKind::Video, key).is_err());
        }
    }

    #[test]
    fn hostile_filenames_lose_their_path() {
        let (_dir, store) = temp_store();
        let stored = store
            .store(MediaKind::Video, "../../etc/passwd", b"x")
            .unwrap();
        assert!(is_valid_key(&stored.key));
        assert!(!stored.key.contains('/'));
    }

    #[test]
    fn extension_sanitization() {
        assert_eq!(key_extension("movie.mp4"), ".mp4");
        assert_eq!(key_extension("MOVIE.MP4"), ".mp4");
        assert_eq!(key_extension("noext"), "");
        assert_eq!(key_extension("weird.e x t"), "");
        assert_eq!(key_extension("archive.tar.gz"), ".gz");
    }

    #[test]
    fn mp4_policy_applies_only_to_suffix() {
        assert!(has_mp4_suffix("film.mp4"));
        assert!(!has_mp4_suffix("film.mkv"));
        assert!(!has_mp4_suffix("film.mp4.avi"));
        // Case-sensitive, matching the original admin upload check
        assert!(!has_mp4_suffix("film.MP4"));
    }
}
