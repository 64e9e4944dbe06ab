//! Represents a product in the remote catalog.
//!
//! # Wire Format
//! Products travel as JSON objects with the fields `_id`, `name`, `stock`, `whereToBuy`
//! and `description`. The id is assigned by the backing store and never changes.
//!
//! See [`CatalogStore`](crate::catalog::CatalogStore) for how products are held locally and
//! [`Draft`](crate::edit::Draft) for the editable copy used by the edit session.
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use std::fmt::Display;

use crate::catalog::ValidationError;

/// Store-assigned identifier for Products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(deserialize_with = "clamped_stock")]
    pub stock: u32,
    #[serde(default)]
    pub where_to_buy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the backing store
    /// * `name` - Product name
    /// * `stock` - Units on hand
    /// * `where_to_buy` - Store name, may be empty
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        stock: u32,
        where_to_buy: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stock,
            where_to_buy: where_to_buy.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// "3 in stock", or "Out of stock" at zero.
    pub fn stock_label(&self) -> String {
        if self.is_in_stock() {
            format!("{} in stock", self.stock)
        } else {
            "Out of stock".to_string()
        }
    }

    pub fn where_to_buy_label(&self) -> &str {
        if self.where_to_buy.is_empty() {
            "Not available"
        } else {
            &self.where_to_buy
        }
    }

    /// Absent and empty descriptions render the same way.
    pub fn description_label(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => "No description available",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireStock {
    Int(i64),
    Float(f64),
}

/// Legacy records can carry negative stock; they are read as zero.
/// Whole-valued floats such as `3.0` are accepted, fractional ones are not.
fn clamped_stock<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match WireStock::deserialize(deserializer)? {
        WireStock::Int(value) => value,
        // Float to int casts saturate.
        WireStock::Float(value) if value.is_finite() && value.fract() == 0.0 => value as i64,
        WireStock::Float(value) => {
            return Err(D::Error::custom(format!(
                "stock must be a whole number, got {}",
                value
            )))
        }
    };
    Ok(raw.clamp(0, i64::from(u32::MAX)) as u32)
}

/// Checks the two rules every outgoing product must satisfy and returns the stock as stored.
pub fn validate_fields(name: &str, stock: i64) -> Result<u32, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    u32::try_from(stock).map_err(|_| ValidationError::NegativeStock(stock))
}

/// Input for the create flow, as typed into the form.
///
/// `stock` is a raw proposal and may be negative until [`NewProduct::validate`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub stock: i64,
    pub where_to_buy: String,
    pub description: String,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, stock: i64, where_to_buy: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stock,
            where_to_buy: where_to_buy.into(),
            description: String::new(),
        }
    }

    pub fn validate(&self) -> Result<ProductCreate, ValidationError> {
        let stock = validate_fields(&self.name, self.stock)?;
        Ok(ProductCreate {
            name: self.name.clone(),
            stock,
            where_to_buy: self.where_to_buy.clone(),
            description: self.description.clone(),
        })
    }
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub stock: u32,
    pub where_to_buy: String,
    pub description: String,
}

/// Stock-only body of `PUT /api/products/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPatch {
    pub stock: u32,
}

/// Where-to-buy choices offered by the create form.
pub const PRESET_STORES: [&str; 4] = ["President Hyper", "Zio", "Clicks", "Letta's Spices"];

/// A where-to-buy selection: one of [`PRESET_STORES`] or a free-text "Other" entry.
///
/// The default is an empty "Other" entry, which leaves where-to-buy blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChoice {
    Preset(&'static str),
    Other(String),
}

impl StoreChoice {
    /// Maps a select value back to a choice. Unknown text is treated as a custom store.
    pub fn from_input(value: &str) -> Self {
        match PRESET_STORES.iter().find(|store| **store == value) {
            Some(store) => StoreChoice::Preset(store),
            None if value == "Other" => StoreChoice::Other(String::new()),
            None => StoreChoice::Other(value.to_string()),
        }
    }

    /// The choice that displays an existing where-to-buy value.
    pub fn for_location(location: &str) -> Self {
        match PRESET_STORES.iter().find(|store| **store == location) {
            Some(store) => StoreChoice::Preset(store),
            None => StoreChoice::Other(location.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StoreChoice::Preset(store) => store,
            StoreChoice::Other(custom) => custom,
        }
    }
}

impl Default for StoreChoice {
    fn default() -> Self {
        StoreChoice::Other(String::new())
    }
}
