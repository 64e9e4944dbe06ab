//! # Catalog
//!
//! The authoritative local snapshot of products and the last-known error.
//!
//! ## Structure
//!
//! - [`store`] - [`CatalogStore`], snapshot mutation and optimistic stock bookkeeping
//! - [`error`] - [`ErrorKind`] for the error slot and [`ValidationError`] for rejected input

pub mod error;
pub mod store;

pub use error::*;
pub use store::*;
