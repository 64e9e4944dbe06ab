//! # Edit Session
//!
//! Holds at most one [`Draft`]: a detached copy of a catalog entry that the user is changing.
//! Nothing written to the draft reaches the catalog until a commit succeeds.
//!
//! Every `begin` bumps a generation number. A commit completion carries the generation it was
//! issued for, so a late completion never clears a draft the user started afterwards.
//!
//! The create form's state lives in [`create`].

pub mod create;

pub use create::*;

use crate::catalog::ValidationError;
use crate::model::{validate_fields, NewProduct, Product, ProductId, StoreChoice};

/// One field change, as produced by an edit form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    /// Raw proposal; may be negative until validated.
    Stock(i64),
    WhereToBuy(String),
    /// A pick from the where-to-buy select; "Other" clears the location.
    Store(StoreChoice),
    Description(String),
}

impl FieldEdit {
    /// Builds an edit from an input's `name` attribute and text value.
    pub fn from_input(field: &str, value: &str) -> Result<Self, ValidationError> {
        match field {
            "name" => Ok(FieldEdit::Name(value.to_string())),
            "stock" => value
                .trim()
                .parse()
                .map(FieldEdit::Stock)
                .map_err(|_| ValidationError::NotANumber(value.to_string())),
            "whereToBuy" => Ok(FieldEdit::WhereToBuy(value.to_string())),
            "store" => Ok(FieldEdit::Store(StoreChoice::from_input(value))),
            "description" => Ok(FieldEdit::Description(value.to_string())),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// An uncommitted copy of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub id: ProductId,
    pub name: String,
    pub stock: i64,
    pub where_to_buy: String,
    pub description: Option<String>,
}

impl Draft {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            stock: i64::from(product.stock),
            where_to_buy: product.where_to_buy.clone(),
            description: product.description.clone(),
        }
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(name) => self.name = name,
            FieldEdit::Stock(stock) => self.stock = stock,
            FieldEdit::WhereToBuy(store) => self.where_to_buy = store,
            FieldEdit::Store(choice) => self.where_to_buy = choice.as_str().to_string(),
            FieldEdit::Description(text) => self.description = Some(text),
        }
    }

    pub fn to_product(&self) -> Result<Product, ValidationError> {
        let stock = validate_fields(&self.name, self.stock)?;
        Ok(Product {
            id: self.id.clone(),
            name: self.name.clone(),
            stock,
            where_to_buy: self.where_to_buy.clone(),
            description: self.description.clone(),
        })
    }
}

impl NewProduct {
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(name) => self.name = name,
            FieldEdit::Stock(stock) => self.stock = stock,
            FieldEdit::WhereToBuy(store) => self.where_to_buy = store,
            FieldEdit::Store(choice) => self.where_to_buy = choice.as_str().to_string(),
            FieldEdit::Description(text) => self.description = text,
        }
    }
}

/// A validated draft on its way to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub generation: u64,
    pub product: Product,
}

#[derive(Debug, Default)]
pub struct EditSession {
    draft: Option<Draft>,
    generation: u64,
    committing: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn is_committing(&self) -> bool {
        self.committing
    }

    /// Starts editing `product`, returning the draft it replaced, if any.
    pub fn begin(&mut self, product: &Product) -> Option<Draft> {
        self.generation += 1;
        self.committing = false;
        self.draft.replace(Draft::from_product(product))
    }

    pub fn update_field(&mut self, edit: FieldEdit) -> Result<(), ValidationError> {
        let draft = self.draft.as_mut().ok_or(ValidationError::NoDraft)?;
        draft.apply(edit);
        Ok(())
    }

    /// Validates the draft and marks it as being committed.
    pub fn prepare_commit(&mut self) -> Result<PendingCommit, ValidationError> {
        let draft = self.draft.as_ref().ok_or(ValidationError::NoDraft)?;
        let product = draft.to_product()?;
        self.committing = true;
        Ok(PendingCommit {
            generation: self.generation,
            product,
        })
    }

    /// Settles a commit. Returns `true` when the session was cleared.
    ///
    /// A failed commit keeps the draft so the user can retry.
    pub fn finish_commit(&mut self, generation: u64, succeeded: bool) -> bool {
        if generation != self.generation {
            return false;
        }
        self.committing = false;
        if succeeded {
            self.draft = None;
        }
        succeeded
    }

    pub fn cancel(&mut self) -> Option<Draft> {
        self.generation += 1;
        self.committing = false;
        self.draft.take()
    }
}
