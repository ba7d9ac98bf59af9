// SPDX-License-Identifier: GPL-3.0-only
use axum::body::Body;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::forms::{PhotoForm, RegisterForm};
use crate::api::models::{
    parse_id, InventoryListResponse, ItemResponse, MessageResponse, SearchQuery, SearchResponse,
    UpdateItemRequest,
};
use crate::registry::Registry;
use crate::storage::PhotoStore;

pub const REGISTER_FORM: &str = "RegisterForm.html";
pub const SEARCH_FORM: &str = "SearchForm.html";

pub struct ApiHandlers {
    registry: Arc<dyn Registry>,
    photos: Arc<dyn PhotoStore>,
    static_dir: PathBuf,
}

impl ApiHandlers {
    pub fn new(registry: Arc<dyn Registry>, photos: Arc<dyn PhotoStore>, static_dir: PathBuf) -> Self {
        Self { registry, photos, static_dir }
    }

    fn lookup_id(raw_id: &str) -> Result<u64, ApiError> {
        parse_id(raw_id).ok_or_else(|| ApiError::item_not_found(raw_id))
    }
}

impl ApiHandlers {
    pub async fn register(
        &self,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
        let form = RegisterForm::from_multipart(multipart).await?;

        // Reject before any photo reaches the cache directory
        if !form.has_name() {
            warn!("Registration rejected: inventory_name missing");
            return Err(ApiError::Validation("inventory_name is required".to_string()));
        }

        let photo_ref = match &form.photo {
            Some(photo) => Some(self.photos.store(&photo.file_name, &photo.content).await?),
            None => None,
        };

        let item = self
            .registry
            .create(form.inventory_name, form.description, photo_ref)?;

        Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("Item registered successfully").with_id(item.id)),
        ))
    }

    pub fn list(&self) -> Json<InventoryListResponse> {
        Json(InventoryListResponse {
            inventory_list: self.registry.list(),
        })
    }

    pub fn get_item(&self, raw_id: &str) -> Result<Json<ItemResponse>, ApiError> {
        let id = Self::lookup_id(raw_id)?;
        let item = self.registry.get(id)?;
        Ok(Json(ItemResponse { item }))
    }

    pub fn update_item(
        &self,
        raw_id: &str,
        body: &[u8],
    ) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
        let id = Self::lookup_id(raw_id)?;
        let request = UpdateItemRequest::from_body(body)?;

        self.registry
            .update(id, request.inventory_name, request.description)?;

        info!(item_id = id, "Inventory item updated");
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("Item updated successfully")),
        ))
    }

    pub async fn get_photo(&self, raw_id: &str) -> Result<Response, ApiError> {
        let id = Self::lookup_id(raw_id)?;
        let item = self.registry.get(id)?;
        let photo = item
            .photo_ref
            .ok_or_else(|| ApiError::NotFound(format!("Inventory item {id} has no photo")))?;

        let stream = self.photos.open(&photo).await.map_err(|e| {
            warn!(error = %e, item_id = id, photo = %photo, "Stored photo unavailable");
            ApiError::NotFound(format!("Photo for inventory item {id} not found"))
        })?;

        Ok((
            [(header::CONTENT_TYPE, content_type_for(&photo))],
            Body::from_stream(stream),
        )
            .into_response())
    }

    pub async fn replace_photo(
        &self,
        raw_id: &str,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
        let id = Self::lookup_id(raw_id)?;
        self.registry.get(id)?;

        let photo = PhotoForm::from_multipart(multipart)
            .await?
            .photo
            .ok_or_else(|| ApiError::Validation("photo is required".to_string()))?;

        let photo_ref = self.photos.store(&photo.file_name, &photo.content).await?;
        self.registry.replace_photo(id, photo_ref)?;

        info!(item_id = id, "Inventory photo replaced");
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("Photo updated successfully")),
        ))
    }

    pub fn delete_item(&self, raw_id: &str) -> Result<Json<MessageResponse>, ApiError> {
        let id = Self::lookup_id(raw_id)?;
        self.registry.delete(id)?;
        Ok(Json(MessageResponse::new("Item deleted successfully")))
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Json<SearchResponse>, ApiError> {
        let raw_id = query.id.as_deref().unwrap_or_default();
        let id = Self::lookup_id(raw_id)?;
        let item = self.registry.get(id)?;

        let photo = if query.wants_photo() {
            item.photo_ref
                .as_deref()
                .map(|name| self.photos.absolute_path(name).to_string_lossy().into_owned())
        } else {
            None
        };

        Ok(Json(SearchResponse {
            id: item.id,
            inventory_name: item.name,
            description: item.description,
            photo,
        }))
    }

    pub async fn static_page(&self, file_name: &str) -> Result<Html<String>, ApiError> {
        let path = self.static_dir.join(file_name);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Html(contents)),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Static page unavailable");
                Err(ApiError::NotFound(format!("{file_name} not found")))
            }
        }
    }
}

/// Guess a photo's media type from its stored name
fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
