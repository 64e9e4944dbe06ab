//! # Inventory Controller
//!
//! The actor that owns all view-model state. Everything the UI can do enters through one
//! [`Intent`] and settles as one [`Outcome`].
//!
//! ## Message flow
//!
//! ```text
//! InventoryClient::dispatch(intent)
//!     -> ControllerRequest::Dispatch        (validate, apply optimistic change, spawn call)
//!     -> ProductApi call on its own task
//!     -> ControllerRequest::Complete        (reconcile, publish view, answer the caller)
//! ```
//!
//! Intents that need no network call are answered in the same turn. Intents that do are answered
//! when their completion has been reconciled, so `dispatch` returning means the published view
//! already reflects the result.
//!
//! ## Observing state
//!
//! After each message the controller publishes a fresh [`InventoryView`](crate::view::InventoryView)
//! on a `watch` channel. [`InventoryClient::view`] reads the latest one;
//! [`InventoryClient::subscribe`] returns a receiver for change notifications.

pub mod actor;
pub mod client;
pub mod error;
pub mod intent;
pub(crate) mod message;

pub use actor::*;
pub use client::*;
pub use error::*;
pub use intent::*;
