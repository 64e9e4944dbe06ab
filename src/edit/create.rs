//! State of the "Add product" form.

use crate::catalog::{ErrorKind, ValidationError};
use crate::edit::FieldEdit;
use crate::model::{NewProduct, StoreChoice};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Invalid(ValidationError),
    Created(String),
    Failed,
}

/// Field values plus the status line shown above the form.
///
/// Fields survive a failed or rejected submission so the user can retry without retyping;
/// they are reset only after a successful create.
///
/// `store` is the where-to-buy select. While it is on "Other", the text typed into the custom
/// location input is both the choice's value and `fields.where_to_buy`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub fields: NewProduct,
    pub store: StoreChoice,
    pub status: FormStatus,
}

impl CreateForm {
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::WhereToBuy(custom) => {
                self.store = StoreChoice::Other(custom.clone());
                self.fields.where_to_buy = custom;
            }
            FieldEdit::Store(choice) => {
                self.fields.where_to_buy = choice.as_str().to_string();
                self.store = choice;
            }
            edit => self.fields.apply(edit),
        }
    }

    /// Takes over fields submitted as a whole.
    pub(crate) fn submitted(&mut self, fields: NewProduct) {
        self.store = StoreChoice::for_location(&fields.where_to_buy);
        self.fields = fields;
    }

    pub fn message(&self) -> Option<String> {
        match &self.status {
            FormStatus::Idle | FormStatus::Submitting => None,
            FormStatus::Invalid(err) => Some(err.to_string()),
            FormStatus::Created(name) => Some(format!("Product added successfully: {}", name)),
            FormStatus::Failed => Some(ErrorKind::CreateFailed.message().to_string()),
        }
    }

    pub(crate) fn created(&mut self, name: String) {
        self.fields = NewProduct::default();
        self.store = StoreChoice::default();
        self.status = FormStatus::Created(name);
    }
}
