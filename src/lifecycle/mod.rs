//! Runtime orchestration and lifecycle management.
//!
//! - [`InventorySystem`] - spawns the controller against a backing API and shuts it down
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod inventory_system;
pub mod tracing;

pub use inventory_system::*;
pub use tracing::*;
