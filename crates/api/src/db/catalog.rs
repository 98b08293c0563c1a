//! Product catalog store.

use shopfast_core::ProductId;

use super::Table;
use crate::models::Product;

/// In-memory product catalog.
///
/// The catalog is seeded at startup and never grows or shrinks; the only
/// mutation is [`Catalog::decrement_stock`] when an order is placed.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Table<ProductId, Product>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the catalog (seeding only).
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    #[must_use]
    pub fn get_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn all(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    /// Filter by free-text query and/or exact category.
    ///
    /// The query matches name or description, case-insensitively. Missing or
    /// empty filters let everything through; both filters must hold when both
    /// are given.
    #[must_use]
    pub fn search(&self, query: Option<&str>, category: Option<&str>) -> Vec<Product> {
        let needle = query.filter(|q| !q.is_empty()).map(str::to_lowercase);
        let category = category.filter(|c| !c.is_empty());

        self.products
            .values()
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches_query(n)))
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.products
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    /// Take `quantity` units out of stock.
    ///
    /// Returns `false` without touching anything when the product is unknown
    /// or holds fewer than `quantity` units.
    pub fn decrement_stock(&mut self, id: &ProductId, quantity: u32) -> bool {
        match self.products.get_mut(id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for product in seed::products() {
            catalog.insert(product);
        }
        catalog
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_all_keeps_seed_order() {
        let all = catalog().all();
        assert_eq!(all.len(), 10);
        assert_eq!(ids(&all)[..3], ["1", "2", "3"]);
    }

    #[test]
    fn test_search_query_matches_name_or_description() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.search(Some("IPHONE"), None)), ["1"]);
        // "professional" only appears in descriptions
        assert_eq!(
            ids(&catalog.search(Some("professional"), None)),
            ["2", "4", "7", "9"]
        );
    }

    #[test]
    fn test_search_filters_are_anded() {
        let catalog = catalog();
        assert_eq!(
            ids(&catalog.search(Some("professional"), Some("camera"))),
            ["4"]
        );
        assert!(catalog.search(Some("iphone"), Some("laptop")).is_empty());
    }

    #[test]
    fn test_search_without_filters_returns_everything() {
        let catalog = catalog();
        assert_eq!(catalog.search(None, None).len(), 10);
        assert_eq!(catalog.search(Some(""), Some("")).len(), 10);
    }

    #[test]
    fn test_by_category_is_exact() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.by_category("laptop")), ["2"]);
        assert!(catalog.by_category("Laptop").is_empty());
        assert!(catalog.by_category("lap").is_empty());
    }

    #[test]
    fn test_decrement_stock() {
        let mut catalog = catalog();
        let id = ProductId::new("4");
        assert!(catalog.decrement_stock(&id, 5));
        assert_eq!(catalog.get_by_id(&id).map(|p| p.stock), Some(10));

        // Over-draw fails and leaves stock alone
        assert!(!catalog.decrement_stock(&id, 11));
        assert_eq!(catalog.get_by_id(&id).map(|p| p.stock), Some(10));

        assert!(catalog.decrement_stock(&id, 10));
        assert_eq!(catalog.get_by_id(&id).map(|p| p.stock), Some(0));
    }

    #[test]
    fn test_decrement_unknown_product() {
        assert!(!catalog().decrement_stock(&ProductId::new("404"), 1));
    }
}
