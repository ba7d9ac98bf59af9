// SPDX-License-Identifier: GPL-3.0-only
use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::{BytesRejection, PathRejection, QueryRejection},
        DefaultBodyLimit, Path, Query, State,
    },
    http::{Method, StatusCode, Uri},
    response::{Html, Response},
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::handlers::{ApiHandlers, REGISTER_FORM, SEARCH_FORM};
use crate::api::models::{
    InventoryListResponse, ItemResponse, MessageResponse, SearchQuery, SearchResponse,
};

type Handlers = State<Arc<ApiHandlers>>;

/// Build the service's route table. Unknown paths and unsupported
/// methods on known paths both answer 405.
pub fn router(handlers: Arc<ApiHandlers>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/register", post(register_handler).fallback(method_not_allowed))
        .route("/inventory", get(list_handler).fallback(method_not_allowed))
        .route(
            "/inventory/:id",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/inventory/:id/photo",
            get(get_photo_handler)
                .put(replace_photo_handler)
                .fallback(method_not_allowed),
        )
        .route("/search", get(search_handler).fallback(method_not_allowed))
        .route(
            "/RegisterForm.html",
            get(register_form_handler).fallback(method_not_allowed),
        )
        .route(
            "/SearchForm.html",
            get(search_form_handler).fallback(method_not_allowed),
        )
        .fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(handlers)
}

pub struct HttpServer {
    handlers: Arc<ApiHandlers>,
    addr: String,
    max_upload_bytes: usize,
}

impl HttpServer {
    pub fn new(handlers: ApiHandlers, addr: String, max_upload_bytes: usize) -> Self {
        Self {
            handlers: Arc::new(handlers),
            addr,
            max_upload_bytes,
        }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn serve(self, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        let app = router(self.handlers, self.max_upload_bytes);

        let listener = TcpListener::bind(&self.addr).await?;
        info!(addr = %listener.local_addr()?, "Starting HTTP server");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

async fn register_handler(
    State(handlers): Handlers,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    handlers.register(multipart).await
}

async fn list_handler(State(handlers): Handlers) -> Json<InventoryListResponse> {
    handlers.list()
}

type IdPath = Result<Path<String>, PathRejection>;

async fn get_item_handler(
    State(handlers): Handlers,
    id: IdPath,
) -> Result<Json<ItemResponse>, ApiError> {
    let Path(id) = id?;
    handlers.get_item(&id)
}

async fn update_item_handler(
    State(handlers): Handlers,
    id: IdPath,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Path(id) = id?;
    handlers.update_item(&id, &body?)
}

async fn delete_item_handler(
    State(handlers): Handlers,
    id: IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    handlers.delete_item(&id)
}

async fn get_photo_handler(
    State(handlers): Handlers,
    id: IdPath,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    handlers.get_photo(&id).await
}

async fn replace_photo_handler(
    State(handlers): Handlers,
    id: IdPath,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Path(id) = id?;
    handlers.replace_photo(&id, multipart).await
}

async fn search_handler(
    State(handlers): Handlers,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    // An unreadable query (e.g. a repeated `id`) names no item
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Unreadable search query");
            SearchQuery::default()
        }
    };
    handlers.search(&query)
}

async fn register_form_handler(State(handlers): Handlers) -> Result<Html<String>, ApiError> {
    handlers.static_page(REGISTER_FORM).await
}

async fn search_form_handler(State(handlers): Handlers) -> Result<Html<String>, ApiError> {
    handlers.static_page(SEARCH_FORM).await
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    warn!(method = %method, uri = %uri, "No route for request");
    ApiError::MethodNotAllowed
}
