//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Controller lifecycle**: start, shutdown and the final catalog size
//! - **Mutations**: loads, creates, stock updates, edits and deletes, with the product `id`
//! - **Stock revisions**: every optimistic update carries `rev`, so a stale or rolled back
//!   completion can be matched to the update that issued it
//! - **Failures**: the error kind plus the transport error that caused it
//!
//! ## Usage
//!
//! ```bash
//! # Applied mutations and failures
//! RUST_LOG=info cargo run
//!
//! # Payloads, dispatched intents and stale completions
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a stock race reads like this:
//!
//! ```text
//! DEBUG set_stock: Sending request id=ProductId("a") stock=6
//! DEBUG Stock update issued id=a rev=1 stock=6
//! DEBUG Stock update issued id=a rev=2 stock=7
//! INFO Stock updated id=a rev=2 stock=7
//! DEBUG Stale completion id=a rev=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
