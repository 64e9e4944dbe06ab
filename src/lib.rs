//! # Inventory View
//!
//! > **A client-side view-model for a remote product inventory.**
//!
//! This crate keeps a local working copy of a REST product collection, derives the filtered and
//! sorted list a user sees, and mediates every change to the backing store. It is built on the
//! actor model with Tokio: one task owns all state, and the rest of the application talks to it
//! through a cloneable client.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One owner, one entry point
//! The [`InventoryController`](controller::InventoryController) owns the catalog, the list
//! criteria, the edit session and the create form. Everything a user can do is an
//! [`Intent`](controller::Intent) sent to it; nothing else mutates state. Messages are handled
//! one at a time, so the state needs no locks.
//!
//! ### Network calls never block the loop
//! Each backend call runs on its own task and posts a completion back into the controller's
//! channel. Stock changes are applied optimistically and rolled back if the server refuses them.
//! Every stock update carries a revision, so a slow completion cannot overwrite a newer value.
//!
//! ### Views are values
//! After every message the controller publishes an
//! [`InventoryView`](view::InventoryView) on a `watch` channel. A view holds an immutable
//! `Arc<[Product]>` snapshot; a later mutation builds a new slice and never touches it.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Actor ([`controller`])
//! - **Role**: Dispatches intents, issues calls, reconciles completions, publishes views.
//! - **Key items**: [`InventoryController`](controller::InventoryController),
//!   [`InventoryClient`](controller::InventoryClient), [`Outcome`](controller::Outcome).
//!
//! ### 2. The State ([`catalog`], [`edit`], [`view`])
//! Plain state machines with no I/O.
//! - [`CatalogStore`](catalog::CatalogStore): snapshot, error slot, optimistic bookkeeping.
//! - [`EditSession`](edit::EditSession) and [`CreateForm`](edit::CreateForm): drafts and forms.
//! - [`project`](view::project): the pure filter/sort function.
//!
//! ### 3. The Transport ([`api`])
//! - **Role**: The [`ProductApi`](api::ProductApi) seam, its `reqwest` implementation and test
//!   doubles.
//!
//! ### 4. The Orchestrator ([`lifecycle`], [`config`])
//! - **Role**: Reads configuration, spawns the controller, installs tracing, shuts down.
//! - **Key items**: [`InventorySystem`](lifecycle::InventorySystem),
//!   [`InventoryConfig`](config::InventoryConfig).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Point the demo at a running backend and print the dashboard totals
//! INVENTORY_API_URL=http://localhost:5000 RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod edit;
pub mod lifecycle;
pub mod model;
pub mod view;
