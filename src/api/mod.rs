// SPDX-License-Identifier: GPL-3.0-only
pub mod error;
pub mod forms;
pub mod handlers;
pub mod http;
pub mod models;

pub use handlers::ApiHandlers;
pub use http::HttpServer;
