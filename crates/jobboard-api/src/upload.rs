//! Multipart form handling for resume submissions.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// A file part of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub file_name: String,
    pub bytes: Bytes,
}

/// A fully read multipart form: text fields and file parts by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Drain `multipart` into memory. Later parts with the same name win.
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?;
                    debug!(field = %name, file_name = %file_name, size = bytes.len(), "Read file part");
                    form.files.insert(name, UploadedFile { file_name, bytes });
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// A text field, or `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// A required text field; missing is a 422.
    pub fn require(&self, name: &str) -> ApiResult<String> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| ApiError::validation(format!("{name}: field required")))
    }

    /// A required file part; missing is a 422.
    pub fn take_file(&mut self, name: &str) -> ApiResult<UploadedFile> {
        self.files
            .remove(name)
            .ok_or_else(|| ApiError::validation(format!("{name}: file required")))
    }

    #[cfg(test)]
    fn from_parts(fields: &[(&str, &str)], files: Vec<(&str, UploadedFile)>) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files.into_iter().map(|(k, f)| (k.to_string(), f)).collect(),
        }
    }
}
