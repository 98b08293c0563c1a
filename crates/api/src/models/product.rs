//! Product domain types.

use serde::Serialize;

use shopfast_core::{Price, ProductId};

/// A catalog entry.
///
/// Only `stock` changes at runtime, and only when an order is placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub stock: u32,
    pub description: String,
    pub rating: f64,
}

impl Product {
    /// Case-insensitive substring match against name or description.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
