//! Plain data: products, their wire DTOs, and the list criteria.

pub mod criteria;
pub mod product;

pub use criteria::*;
pub use product::*;
