/// Multipart form extraction
///
/// Image-bearing write endpoints accept `multipart/form-data`: scalar fields
/// as text parts plus at most one file part. This module collects the parts
/// into a simple map and validates the file against the image upload rules
/// (jpeg/png, 5 MiB cap) before any handler logic runs.
use std::collections::BTreeMap;

use axum::extract::multipart::Multipart;
use listora_shared::storage::{
    guess_content_type, is_allowed_image_type, object_key, ObjectStore, MAX_IMAGE_BYTES,
};
use tracing::warn;

use crate::error::ApiError;

/// A validated image file from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Parsed multipart form: text fields plus an optional image
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: BTreeMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl MultipartForm {
    /// Text field value, if present and non-empty
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Text field value, or a validation error naming the field
    pub fn require_field(&self, name: &str) -> Result<&str, ApiError> {
        self.field(name)
            .ok_or_else(|| ApiError::invalid_field(name, format!("{} is required", name)))
    }
}

/// Reads a multipart request into a [`MultipartForm`]
///
/// The file part must arrive under `file_field`; a file under any other
/// name is rejected. Oversized or non-image files fail here with a
/// validation error.
pub async fn parse_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<MultipartForm, ApiError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {}", e)))?
    {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        let is_file = field.file_name().is_some();
        if is_file {
            if name != file_field {
                return Err(ApiError::invalid_field(
                    &name,
                    format!("Unexpected file field, expected {}", file_field),
                ));
            }

            let filename = field
                .file_name()
                .map(String::from)
                .unwrap_or_else(|| "upload".to_string());

            let content_type = field
                .content_type()
                .map(String::from)
                .unwrap_or_else(|| guess_content_type(&filename));

            if !is_allowed_image_type(&content_type) {
                return Err(ApiError::invalid_field(
                    file_field,
                    "Only jpeg, jpg and png images are allowed",
                ));
            }

            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

            if bytes.len() > MAX_IMAGE_BYTES {
                return Err(ApiError::invalid_field(
                    file_field,
                    "Image must be at most 5 MB",
                ));
            }

            form.image = Some(UploadedImage {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Malformed multipart field: {}", e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Stores an uploaded image under a namespace and returns its public URL
pub async fn store_image(
    store: &dyn ObjectStore,
    namespace: &str,
    image: &UploadedImage,
) -> Result<String, ApiError> {
    let key = object_key(namespace, &image.filename);
    let url = store
        .put(&key, image.bytes.clone(), &image.content_type)
        .await?;
    Ok(url)
}

/// Best-effort removal of a stored image by its public URL
///
/// URLs that do not belong to this store (seeded data, external links) are
/// left alone; deletion failures are logged, not surfaced, since the owning
/// row is already gone.
pub async fn discard_image(store: &dyn ObjectStore, url: &str) {
    if let Some(key) = store.key_for_url(url) {
        if let Err(e) = store.delete(&key).await {
            warn!(key = %key, "Failed to delete stored image: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> MultipartForm {
        MultipartForm {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    #[test]
    fn test_field_lookup() {
        let form = form_with(&[("name", "Gaming"), ("description", "")]);

        assert_eq!(form.field("name"), Some("Gaming"));
        // Empty values read as absent.
        assert_eq!(form.field("description"), None);
        assert_eq!(form.field("missing"), None);
    }

    #[test]
    fn test_require_field() {
        let form = form_with(&[("title", "Sale")]);

        assert_eq!(form.require_field("title").unwrap(), "Sale");
        assert!(form.require_field("linkType").is_err());
    }
}
