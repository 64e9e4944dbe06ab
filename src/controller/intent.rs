//! The single input type of the controller and the result of dispatching it.

use crate::catalog::{ErrorKind, ValidationError};
use crate::edit::FieldEdit;
use crate::model::{NewProduct, ProductId, SortOption, StockFilter};

/// A user intent. Every variant maps to exactly one controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Fetch the collection and replace the snapshot.
    Load,
    /// Submit the create form with these fields.
    Create(NewProduct),
    /// Change one field of the create form.
    ChangeCreateField(FieldEdit),
    /// Set a product's stock. Values below zero are clamped.
    SetStock { id: ProductId, stock: i64 },
    /// Move a product's stock by `delta` (the +/- buttons).
    AdjustStock { id: ProductId, delta: i64 },
    BeginEdit(ProductId),
    ChangeEditField(FieldEdit),
    CommitEdit,
    CancelEdit,
    Delete(ProductId),
    SetSearch(String),
    SetStockFilter(StockFilter),
    SetSort(SortOption),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Load => "load",
            Intent::Create(_) => "create",
            Intent::ChangeCreateField(_) => "change-create-field",
            Intent::SetStock { .. } => "set-stock",
            Intent::AdjustStock { .. } => "adjust-stock",
            Intent::BeginEdit(_) => "begin-edit",
            Intent::ChangeEditField(_) => "change-edit-field",
            Intent::CommitEdit => "commit-edit",
            Intent::CancelEdit => "cancel-edit",
            Intent::Delete(_) => "delete",
            Intent::SetSearch(_) => "set-search",
            Intent::SetStockFilter(_) => "set-stock-filter",
            Intent::SetSort(_) => "set-sort",
        }
    }
}

/// How an intent settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed, including any network round trip.
    Applied,
    /// Input rejected locally; nothing was sent and the error slot is untouched.
    Rejected(ValidationError),
    /// The network call failed; the error slot holds the kind.
    Failed(ErrorKind),
    /// Nothing to do: unknown id, unchanged stock, or a completion overtaken by a newer one.
    Ignored,
}
