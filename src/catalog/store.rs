//! # Catalog Store
//!
//! The local working copy of the remote catalog plus the single error slot.
//!
//! The store is a plain state machine: it never talks to the network. The
//! [`InventoryController`](crate::controller::InventoryController) issues the calls and feeds
//! their results back through the `apply_*` / `finish_*` methods.
//!
//! ## Immutable snapshots
//!
//! Products are held in an `Arc<[Product]>`. Every mutation builds a new slice, so a snapshot
//! handed out to a view is never changed underneath it.
//!
//! ## Optimistic stock updates
//!
//! [`CatalogStore::begin_stock_update`] writes the new stock immediately and tags the change with
//! a revision from a monotonic counter. For each product the store keeps every revision still in
//! flight, the revision whose value is shown, and the last value the server confirmed:
//!
//! | Completion | Shown revision? | Effect |
//! |------------|-----------------|--------|
//! | success | yes | keep the value, it is now confirmed |
//! | success | no | remember the value as confirmed, keep the newer optimistic value |
//! | failure | yes | fall back to the newest revision still in flight, else to the last confirmed value |
//! | failure | no | nothing to undo, a newer update owns the entry |
//!
//! The entry is dropped once no revision for the product is in flight.

use super::error::ErrorKind;
use crate::model::{Product, ProductId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A stock update accepted by [`CatalogStore::begin_stock_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockTicket {
    pub rev: u64,
    pub stock: u32,
}

/// What `begin_stock_update` decided to do with a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    /// The optimistic value is in place; the caller must issue the network call.
    Issued(StockTicket),
    /// After clamping, the proposal equals the current stock.
    Unchanged,
    /// No product with that id.
    Unknown,
}

/// How a stock update completion was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockReconcile {
    Confirmed,
    RolledBack { to: u32 },
    /// A newer update for the same product is still in flight.
    Superseded,
    /// The product was reloaded, replaced or removed since the update was issued.
    Detached,
}

#[derive(Debug, Clone)]
struct PendingStock {
    /// Optimistic values still awaiting a completion, by revision.
    in_flight: BTreeMap<u64, u32>,
    /// Revision whose value the snapshot currently shows.
    shown_rev: u64,
    confirmed: u32,
    confirmed_rev: u64,
}

#[derive(Debug)]
pub struct CatalogStore {
    products: Arc<[Product]>,
    error: Option<ErrorKind>,
    pending: HashMap<ProductId, PendingStock>,
    next_rev: u64,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self {
            products: Arc::from(Vec::new()),
            error: None,
            pending: HashMap::new(),
            next_rev: 0,
        }
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<[Product]> {
        self.products.clone()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn total_stock(&self) -> u64 {
        self.products.iter().map(|product| u64::from(product.stock)).sum()
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    pub fn set_error(&mut self, kind: ErrorKind) {
        self.error = Some(kind);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Replaces the whole snapshot with a freshly fetched collection.
    ///
    /// Outstanding stock updates are detached: the fetched values win.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products.into();
        self.pending.clear();
        self.error = None;
    }

    /// Appends a product returned by the create call.
    pub fn apply_create(&mut self, product: Product) {
        self.products = self
            .products
            .iter()
            .cloned()
            .chain(std::iter::once(product))
            .collect();
        self.error = None;
    }

    /// Clamps `proposed` to zero and applies it optimistically.
    pub fn begin_stock_update(&mut self, id: &ProductId, proposed: i64) -> StockChange {
        let Some(current) = self.get(id).map(|product| product.stock) else {
            return StockChange::Unknown;
        };
        let stock = proposed.clamp(0, i64::from(u32::MAX)) as u32;
        if stock == current {
            return StockChange::Unchanged;
        }

        self.next_rev += 1;
        let rev = self.next_rev;
        let pending = self
            .pending
            .entry(id.clone())
            .or_insert_with(|| PendingStock {
                in_flight: BTreeMap::new(),
                shown_rev: rev,
                confirmed: current,
                confirmed_rev: 0,
            });
        pending.in_flight.insert(rev, stock);
        pending.shown_rev = rev;
        self.set_stock(id, stock);
        StockChange::Issued(StockTicket { rev, stock })
    }

    /// Reconciles the completion of the stock update tagged `ticket`.
    pub fn finish_stock_update(
        &mut self,
        id: &ProductId,
        ticket: StockTicket,
        succeeded: bool,
    ) -> StockReconcile {
        if succeeded {
            self.error = None;
        } else {
            self.error = Some(ErrorKind::UpdateFailed);
        }

        let Some(pending) = self.pending.get_mut(id) else {
            return StockReconcile::Detached;
        };
        if pending.in_flight.remove(&ticket.rev).is_none() {
            return StockReconcile::Detached;
        }
        if succeeded && ticket.rev > pending.confirmed_rev {
            pending.confirmed = ticket.stock;
            pending.confirmed_rev = ticket.rev;
        }

        let outcome = if ticket.rev != pending.shown_rev {
            StockReconcile::Superseded
        } else if succeeded {
            StockReconcile::Confirmed
        } else {
            let (rev, to) = pending
                .in_flight
                .iter()
                .next_back()
                .map(|(rev, stock)| (*rev, *stock))
                .unwrap_or((pending.confirmed_rev, pending.confirmed));
            pending.shown_rev = rev;
            StockReconcile::RolledBack { to }
        };

        if pending.in_flight.is_empty() {
            self.pending.remove(id);
        }
        if let StockReconcile::RolledBack { to } = outcome {
            self.set_stock(id, to);
        }
        outcome
    }

    /// Replaces the entry whose id matches `product.id`. Returns `false` if there is none.
    pub fn apply_full_update(&mut self, product: Product) -> bool {
        self.error = None;
        if self.get(&product.id).is_none() {
            return false;
        }
        self.pending.remove(&product.id);
        self.products = self
            .products
            .iter()
            .map(|existing| {
                if existing.id == product.id {
                    product.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        true
    }

    /// Removes the entry with `id`. Returns `false` if there is none.
    pub fn apply_delete(&mut self, id: &ProductId) -> bool {
        self.error = None;
        if self.get(id).is_none() {
            return false;
        }
        self.pending.remove(id);
        self.products = self
            .products
            .iter()
            .filter(|product| &product.id != id)
            .cloned()
            .collect();
        true
    }

    fn set_stock(&mut self, id: &ProductId, stock: u32) {
        self.products = self
            .products
            .iter()
            .map(|product| {
                if &product.id == id {
                    Product {
                        stock,
                        ..product.clone()
                    }
                } else {
                    product.clone()
                }
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(products: Vec<Product>) -> CatalogStore {
        let mut store = CatalogStore::new();
        store.replace(products);
        store
    }

    fn id(raw: &str) -> ProductId {
        ProductId::from(raw)
    }

    fn issued(change: StockChange) -> StockTicket {
        match change {
            StockChange::Issued(ticket) => ticket,
            other => panic!("Expected Issued, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_stock_update_rolls_back() {
        let mut store = store_with(vec![Product::new("1", "Widget", 5, "Zio")]);

        let ticket = issued(store.begin_stock_update(&id("1"), 6));
        assert_eq!(store.get(&id("1")).unwrap().stock, 6);

        let outcome = store.finish_stock_update(&id("1"), ticket, false);
        assert_eq!(outcome, StockReconcile::RolledBack { to: 5 });
        assert_eq!(store.get(&id("1")).unwrap().stock, 5);
        assert_eq!(store.error(), Some(ErrorKind::UpdateFailed));
    }

    #[test]
    fn test_successful_stock_update_is_kept() {
        let mut store = store_with(vec![Product::new("1", "Widget", 5, "Zio")]);
        store.set_error(ErrorKind::FetchFailed);

        let ticket = issued(store.begin_stock_update(&id("1"), 4));
        let outcome = store.finish_stock_update(&id("1"), ticket, true);

        assert_eq!(outcome, StockReconcile::Confirmed);
        assert_eq!(store.get(&id("1")).unwrap().stock, 4);
        assert_eq!(store.error(), None);

        // Settled: a late duplicate completion has nothing left to reconcile.
        assert_eq!(
            store.finish_stock_update(&id("1"), ticket, false),
            StockReconcile::Detached
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 4);
    }

    #[test]
    fn test_negative_proposal_is_clamped() {
        let mut store = store_with(vec![Product::new("1", "Widget", 2, "Zio")]);
        let ticket = issued(store.begin_stock_update(&id("1"), -4));
        assert_eq!(ticket.stock, 0);
        assert_eq!(store.get(&id("1")).unwrap().stock, 0);

        // Already at zero: a further decrement changes nothing.
        store.finish_stock_update(&id("1"), ticket, true);
        assert_eq!(store.begin_stock_update(&id("1"), -1), StockChange::Unchanged);
    }

    #[test]
    fn test_unknown_product() {
        let mut store = store_with(vec![]);
        assert_eq!(store.begin_stock_update(&id("x"), 1), StockChange::Unknown);
    }

    #[test]
    fn test_stale_completion_does_not_clobber_newer_value() {
        let mut store = store_with(vec![Product::new("1", "Widget", 5, "Zio")]);
        let first = issued(store.begin_stock_update(&id("1"), 6));
        let second = issued(store.begin_stock_update(&id("1"), 7));

        // First fails after second was issued: the entry belongs to the second update.
        assert_eq!(
            store.finish_stock_update(&id("1"), first, false),
            StockReconcile::Superseded
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 7);

        assert_eq!(
            store.finish_stock_update(&id("1"), second, true),
            StockReconcile::Confirmed
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 7);
    }

    #[test]
    fn test_both_updates_fail_restores_original() {
        let mut store = store_with(vec![Product::new("1", "Widget", 5, "Zio")]);
        let first = issued(store.begin_stock_update(&id("1"), 6));
        let second = issued(store.begin_stock_update(&id("1"), 7));

        assert_eq!(
            store.finish_stock_update(&id("1"), second, false),
            StockReconcile::RolledBack { to: 6 }
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 6);
        assert_eq!(
            store.finish_stock_update(&id("1"), first, false),
            StockReconcile::RolledBack { to: 5 }
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 5);
    }

    #[test]
    fn test_newer_failure_then_older_success_keeps_accepted_value() {
        let mut store = store_with(vec![Product::new("1", "Widget", 5, "Zio")]);
        let first = issued(store.begin_stock_update(&id("1"), 6));
        let second = issued(store.begin_stock_update(&id("1"), 7));

        // The older update is still in flight, so its value is what the server may hold.
        assert_eq!(
            store.finish_stock_update(&id("1"), second, false),
            StockReconcile::RolledBack { to: 6 }
        );
        assert_eq!(
            store.finish_stock_update(&id("1"), first, true),
            StockReconcile::Confirmed
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 6);
        assert_eq!(store.error(), None);
    }

    #[test]
    fn test_older_success_after_newer_success_is_superseded() {
        let mut store = store_with(vec![Product::new("1", "Widget", 5, "Zio")]);
        let first = issued(store.begin_stock_update(&id("1"), 6));
        let second = issued(store.begin_stock_update(&id("1"), 7));
        let third = issued(store.begin_stock_update(&id("1"), 8));

        assert_eq!(
            store.finish_stock_update(&id("1"), second, true),
            StockReconcile::Superseded
        );
        assert_eq!(
            store.finish_stock_update(&id("1"), first, true),
            StockReconcile::Superseded
        );
        // The stale first success must not replace the newer confirmed value.
        assert_eq!(
            store.finish_stock_update(&id("1"), third, false),
            StockReconcile::RolledBack { to: 7 }
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 7);
    }

    #[test]
    fn test_rollback_targets_last_confirmed_value() {
        let mut store = store_with(vec![Product::new("1", "Widget", 5, "Zio")]);
        let first = issued(store.begin_stock_update(&id("1"), 6));
        let second = issued(store.begin_stock_update(&id("1"), 7));

        store.finish_stock_update(&id("1"), first, true);
        assert_eq!(
            store.finish_stock_update(&id("1"), second, false),
            StockReconcile::RolledBack { to: 6 }
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 6);
    }

    #[test]
    fn test_reload_detaches_pending_updates() {
        let mut store = store_with(vec![Product::new("1", "Widget", 5, "Zio")]);
        let ticket = issued(store.begin_stock_update(&id("1"), 6));

        store.replace(vec![Product::new("1", "Widget", 9, "Zio")]);
        assert_eq!(
            store.finish_stock_update(&id("1"), ticket, false),
            StockReconcile::Detached
        );
        assert_eq!(store.get(&id("1")).unwrap().stock, 9);
    }

    #[test]
    fn test_delete() {
        let mut store = store_with(vec![
            Product::new("1", "Widget", 1, ""),
            Product::new("2", "Gadget", 2, ""),
        ]);
        assert!(store.apply_delete(&id("1")));
        let ids: Vec<_> = store.snapshot().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![id("2")]);
        assert!(!store.apply_delete(&id("1")));
    }

    #[test]
    fn test_snapshots_are_immutable_values() {
        let mut store = store_with(vec![Product::new("1", "Widget", 1, "")]);
        let before = store.snapshot();

        store.apply_create(Product::new("2", "Gadget", 3, "Clicks"));
        issued(store.begin_stock_update(&id("1"), 8));

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].stock, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_stock(), 11);
    }

    #[test]
    fn test_full_update_replaces_entry_in_place() {
        let mut store = store_with(vec![
            Product::new("1", "Widget", 1, ""),
            Product::new("2", "Gadget", 2, ""),
        ]);
        let edited = Product::new("1", "Widget Pro", 4, "Zio").with_description("new");
        assert!(store.apply_full_update(edited.clone()));
        assert_eq!(store.snapshot()[0], edited);
        assert!(!store.apply_full_update(Product::new("9", "Ghost", 0, "")));
    }
}
