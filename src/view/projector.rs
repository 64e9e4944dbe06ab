//! # View Projector
//!
//! [`project`] derives the visible product list from a snapshot and the active [`Criteria`].
//! It is a pure function: the same inputs always give the same sequence in the same order.

use crate::model::{Criteria, Product, SortOption};

/// Case-insensitive match of `query` against name, where-to-buy and description.
///
/// An empty query matches everything.
pub fn matches_query(product: &Product, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    let description = product.description.as_deref().unwrap_or_default();
    [product.name.as_str(), product.where_to_buy.as_str(), description]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Filters, then sorts. `sort_by_key` is stable, so equal stock keeps snapshot order.
pub fn project(snapshot: &[Product], criteria: &Criteria) -> Vec<Product> {
    let mut visible: Vec<Product> = snapshot
        .iter()
        .filter(|product| {
            matches_query(product, &criteria.search_query)
                && criteria.stock_filter.matches(product.stock)
        })
        .cloned()
        .collect();

    match criteria.sort_option {
        SortOption::None => {}
        SortOption::LowStock => visible.sort_by_key(|product| product.stock),
        SortOption::HighStock => visible.sort_by_key(|product| std::cmp::Reverse(product.stock)),
    }
    visible
}
