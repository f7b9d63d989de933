//! Multipart form assembly.
//!
//! Collects an axum multipart stream into named text fields and uploaded
//! files so handlers can validate the whole form at once.

use std::collections::HashMap;

use axum::extract::Multipart;
use vidtube_common::{AppError, AppResult};
use vidtube_core::UploadFile;

/// A fully read multipart form.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadFile>,
}

impl FormData {
    /// Drain a multipart stream into memory.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(ToString::to_string) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
                form.files.insert(
                    name,
                    UploadFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {e}")))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// A text field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A required text field.
    pub fn require_field(&self, name: &str) -> AppResult<&str> {
        self.field(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Validation(format!("Missing field: {name}")))
    }

    /// An uploaded file, if present.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadFile> {
        self.files.get(name)
    }

    /// A required uploaded file.
    pub fn require_file(&self, name: &str) -> AppResult<&UploadFile> {
        self.file(name)
            .ok_or_else(|| AppError::Validation(format!("Missing file: {name}")))
    }
}
