// SPDX-License-Identifier: GPL-3.0-only
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use std::collections::HashMap;

use crate::api::error::ApiError;

/// A file part of a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Filename as sent by the client, unsanitized
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Multipart body of `POST /register`
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub inventory_name: Option<String>,
    pub description: Option<String>,
    pub photo: Option<UploadedFile>,
}

impl RegisterForm {
    pub async fn from_multipart(
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Self, ApiError> {
        let mut fields = MultipartFields::read(multipart).await?;
        Ok(Self {
            inventory_name: fields.text.remove("inventory_name"),
            description: fields.text.remove("description"),
            photo: fields.files.remove("photo"),
        })
    }

    pub fn has_name(&self) -> bool {
        self.inventory_name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// Multipart body of `PUT /inventory/{id}/photo`
#[derive(Debug, Default)]
pub struct PhotoForm {
    pub photo: Option<UploadedFile>,
}

impl PhotoForm {
    pub async fn from_multipart(
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Self, ApiError> {
        let mut fields = MultipartFields::read(multipart).await?;
        Ok(Self {
            photo: fields.files.remove("photo"),
        })
    }
}

#[derive(Debug, Default)]
struct MultipartFields {
    text: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartFields {
    async fn read(multipart: Result<Multipart, MultipartRejection>) -> Result<Self, ApiError> {
        let mut multipart = multipart.map_err(|e| ApiError::Validation(e.to_string()))?;
        let mut fields = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let content = field.bytes().await.map_err(malformed)?;
                    // A browser form submitted without choosing a file
                    if file_name.is_empty() {
                        continue;
                    }
                    fields.files.insert(name, UploadedFile { file_name, content: content.to_vec() });
                }
                None => {
                    let value = field.text().await.map_err(malformed)?;
                    fields.text.insert(name, value);
                }
            }
        }

        Ok(fields)
    }
}

fn malformed(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(err.body_text());
    }
    ApiError::Validation(format!("Malformed multipart body: {err}"))
}
