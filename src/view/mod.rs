//! # Published View
//!
//! [`InventoryView`] is what subscribers see: an immutable picture of the controller's state,
//! rebuilt and published after every message the controller handles.
//!
//! - [`projector`] - the pure filter/sort function behind [`InventoryView::visible`]

pub mod projector;

pub use projector::*;

use crate::catalog::{CatalogStore, ErrorKind};
use crate::edit::{CreateForm, Draft, EditSession};
use crate::model::{Criteria, Product};
use std::sync::Arc;

/// Totals shown on the dashboard, computed over the whole snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_stock: u64,
}

#[derive(Debug, Clone)]
pub struct InventoryView {
    /// The full catalog snapshot.
    pub products: Arc<[Product]>,
    /// The projection of `products` under `criteria`.
    pub visible: Vec<Product>,
    pub criteria: Criteria,
    pub draft: Option<Draft>,
    pub committing: bool,
    pub create_form: CreateForm,
    pub error: Option<ErrorKind>,
    pub stats: DashboardStats,
    /// At least one load is in flight.
    pub loading: bool,
}

impl Default for InventoryView {
    fn default() -> Self {
        Self {
            products: Arc::from(Vec::new()),
            visible: Vec::new(),
            criteria: Criteria::default(),
            draft: None,
            committing: false,
            create_form: CreateForm::default(),
            error: None,
            stats: DashboardStats::default(),
            loading: false,
        }
    }
}

impl InventoryView {
    pub fn build(
        store: &CatalogStore,
        criteria: &Criteria,
        session: &EditSession,
        create_form: &CreateForm,
        loading: bool,
    ) -> Self {
        let products = store.snapshot();
        let visible = project(&products, criteria);
        Self {
            stats: DashboardStats {
                total_products: products.len(),
                total_stock: store.total_stock(),
            },
            products,
            visible,
            criteria: criteria.clone(),
            draft: session.draft().cloned(),
            committing: session.is_committing(),
            create_form: create_form.clone(),
            error: store.error(),
            loading,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(|kind| kind.message())
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id.as_str() == id)
    }
}
