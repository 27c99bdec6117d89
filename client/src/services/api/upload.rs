//! # Image Uploads
//!
//! In-memory image files and the client-side limits they must satisfy before
//! any bytes are sent.

use reqwest::multipart::{Form, Part};

use crate::config::UploadLimits;
use crate::core::error::{ApiResult, ClassifiedError};

/// An image picked by the user, fully read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Reject an empty batch or one that breaks the count, size or type limits.
/// The error is `Rejected` keyed by `field` so forms can show it inline.
pub fn validate_uploads(images: &[ImageUpload], limits: &UploadLimits, field: &str) -> ApiResult<()> {
    if images.is_empty() {
        return Err(upload_error(field, "Додайте хоча б одне зображення".to_string()));
    }
    if images.len() > limits.max_files {
        return Err(upload_error(
            field,
            format!("Можна завантажити не більше {} зображень", limits.max_files),
        ));
    }

    for image in images {
        if !limits
            .accepted_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&image.content_type))
        {
            return Err(upload_error(
                field,
                format!("Файл {} має непідтримуваний формат", image.file_name),
            ));
        }
        if image.size() > limits.max_file_size {
            return Err(upload_error(
                field,
                format!(
                    "Файл {} перевищує {} МБ",
                    image.file_name,
                    limits.max_file_size / (1024 * 1024)
                ),
            ));
        }
    }
    Ok(())
}

/// Append every image to `form` under the multipart field `field`.
pub(crate) fn attach_images(mut form: Form, field: &str, images: Vec<ImageUpload>) -> ApiResult<Form> {
    for image in images {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| upload_error(field, e.to_string()))?;
        form = form.part(field.to_string(), part);
    }
    Ok(form)
}

fn upload_error(field: &str, message: String) -> ClassifiedError {
    tracing::debug!(field, %message, "Upload rejected before sending");
    ClassifiedError::Rejected {
        fields: [(field.to_string(), message.clone())].into_iter().collect(),
        message,
    }
}
