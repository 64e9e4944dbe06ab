//! Error types for the catalog.

use thiserror::Error;

/// The kind of failure held in the catalog's single error slot.
///
/// Every network operation maps onto exactly one kind. Stock-only and full-record updates
/// share [`ErrorKind::UpdateFailed`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    #[error("fetch-failed")]
    FetchFailed,
    #[error("create-failed")]
    CreateFailed,
    #[error("update-failed")]
    UpdateFailed,
    #[error("delete-failed")]
    DeleteFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FetchFailed => "fetch-failed",
            ErrorKind::CreateFailed => "create-failed",
            ErrorKind::UpdateFailed => "update-failed",
            ErrorKind::DeleteFailed => "delete-failed",
        }
    }

    /// Text shown to the user for this failure.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::FetchFailed => "Error fetching products",
            ErrorKind::CreateFailed => "Error adding product. Please try again.",
            ErrorKind::UpdateFailed => "Error updating stock",
            ErrorKind::DeleteFailed => "Error deleting product",
        }
    }
}

/// Client-side input rejected before any network call.
///
/// These never reach the error slot; they belong to the form that produced them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Product name is required")]
    EmptyName,

    #[error("Stock cannot be negative: {0}")]
    NegativeStock(i64),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Stock must be a whole number: {0}")]
    NotANumber(String),

    #[error("No product is being edited")]
    NoDraft,
}
