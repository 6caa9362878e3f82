//! Object storage abstraction
//!
//! Uploaded images land behind the [`ObjectStore`] trait with two backends:
//! an S3-compatible bucket (AWS, R2, MinIO) and a local-disk store for
//! development. Both return a public URL for the stored object, which is
//! what the database keeps; keys are derivable from those URLs so images
//! can be cleaned up when their owner is deleted.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use async_trait::async_trait;

pub mod local;
pub mod s3;

pub use local::LocalStore;
pub use s3::{S3Config, S3Store};

/// Largest accepted image upload (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for image uploads
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Whether a MIME type is an accepted image type
pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// Guesses a MIME type from a filename, falling back to octet-stream
pub fn guess_content_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

/// Storage backend for uploaded objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores an object and returns its public URL
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    /// Removes an object; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Maps a public URL back to this store's key, if the URL belongs to it
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// Builds a collision-resistant object key for an upload
///
/// Keys take the form `{namespace}/{unix_millis}-{filename}` with the
/// filename reduced to a safe character set, so the original name stays
/// recognizable in the bucket listing.
pub fn object_key(namespace: &str, original_filename: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    format!(
        "{}/{}-{}",
        namespace,
        millis,
        sanitize_filename(original_filename)
    )
}

/// Reduces a client-supplied filename to `[a-zA-Z0-9._-]`
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_image_types() {
        assert!(is_allowed_image_type("image/jpeg"));
        assert!(is_allowed_image_type("image/jpg"));
        assert!(is_allowed_image_type("image/png"));
        assert!(!is_allowed_image_type("image/gif"));
        assert!(!is_allowed_image_type("application/pdf"));
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("logo.png"), "image/png");
        assert_eq!(guess_content_type("photo.jpg"), "image/jpeg");
        assert_eq!(guess_content_type("mystery"), "application/octet-stream");
    }

    #[test]
    fn test_object_key_shape() {
        let key = object_key("banners", "summer sale.png");
        assert!(key.starts_with("banners/"));
        assert!(key.ends_with("-summer-sale.png"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("logo.png"), "logo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "..-..-etc-passwd");
        assert_eq!(sanitize_filename(""), "upload");
    }
}
