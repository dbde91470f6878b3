//! # itemstore HTTP Server Module
//!
//! Axum transport layer over the document store. Translates HTTP requests
//! into store calls and maps results: not-found becomes 404, an empty
//! partial update becomes 400, store failures become 500.
//!
//! # Endpoints
//!
//! - `GET /` - Service banner
//! - `GET /health` - Health check
//! - `POST /api/items` - Create an item (201)
//! - `GET /api/items` - List items in insertion order
//! - `GET /api/items/:id` - Fetch one item
//! - `PUT /api/items/:id` - Partial update
//! - `DELETE /api/items/:id` - Delete (204)

pub mod config;
pub mod errors;
pub mod item_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
