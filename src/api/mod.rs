//! # Backing Collection API
//!
//! The controller never speaks HTTP directly. It holds an `Arc<dyn ProductApi>` and calls the
//! five operations of the REST collection resource through it:
//!
//! | Operation | Request | Success |
//! |-----------|---------|---------|
//! | [`list`](ProductApi::list) | `GET /api/products` | array of products |
//! | [`create`](ProductApi::create) | `POST /api/products` | created product with `_id` |
//! | [`update_stock`](ProductApi::update_stock) | `PUT /api/products/{id}` `{stock}` | product or empty |
//! | [`update`](ProductApi::update) | `PUT /api/products/{id}` full record | product or empty |
//! | [`delete`](ProductApi::delete) | `DELETE /api/products/{id}` | optional `{message}` |
//!
//! ## Implementations
//!
//! - [`HttpProductApi`] - `reqwest` client for a real server
//! - [`mock::MockApi`] - fluent expectations for deterministic tests
//! - [`mock::channel_api`] - every call arrives on a channel and the test answers it by hand,
//!   which lets a test choose the order in which concurrent calls complete

pub mod error;
pub mod http;
pub mod mock;

pub use error::*;
pub use http::*;

use crate::model::{Product, ProductCreate, ProductId, StockPatch};
use async_trait::async_trait;

#[async_trait]
pub trait ProductApi: Send + Sync + 'static {
    async fn list(&self) -> ApiResult<Vec<Product>>;

    async fn create(&self, product: ProductCreate) -> ApiResult<Product>;

    async fn update_stock(&self, id: ProductId, patch: StockPatch) -> ApiResult<Option<Product>>;

    async fn update(&self, product: Product) -> ApiResult<Option<Product>>;

    /// Returns the server's confirmation message, if it sent one.
    async fn delete(&self, id: ProductId) -> ApiResult<Option<String>>;
}
