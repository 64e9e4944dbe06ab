//! Search, stock filter and sort criteria for the product list.
//!
//! The criteria are transient and owned by the controller. Each enum parses from and prints as
//! the kebab-case value used by the list's select boxes (`in-stock`, `low-stock`, ...).

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Which products to keep by stock level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockFilter {
    #[default]
    All,
    InStock,
    OutOfStock,
}

impl StockFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockFilter::All => "all",
            StockFilter::InStock => "in-stock",
            StockFilter::OutOfStock => "out-of-stock",
        }
    }

    pub fn matches(&self, stock: u32) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::InStock => stock > 0,
            StockFilter::OutOfStock => stock == 0,
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    None,
    LowStock,
    HighStock,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::None => "none",
            SortOption::LowStock => "low-stock",
            SortOption::HighStock => "high-stock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseCriteriaError {
    kind: &'static str,
    value: String,
}

impl FromStr for StockFilter {
    type Err = ParseCriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StockFilter::All),
            "in-stock" => Ok(StockFilter::InStock),
            "out-of-stock" => Ok(StockFilter::OutOfStock),
            _ => Err(ParseCriteriaError {
                kind: "stock filter",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SortOption {
    type Err = ParseCriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SortOption::None),
            "low-stock" => Ok(SortOption::LowStock),
            "high-stock" => Ok(SortOption::HighStock),
            _ => Err(ParseCriteriaError {
                kind: "sort option",
                value: s.to_string(),
            }),
        }
    }
}

impl Display for StockFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete set of list criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub search_query: String,
    pub stock_filter: StockFilter,
    pub sort_option: SortOption,
}

impl Criteria {
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_stock_filter(mut self, filter: StockFilter) -> Self {
        self.stock_filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort_option = sort;
        self
    }
}
