//! Seed data loaded into a fresh [`Database`](super::Database).

use shopfast_core::{Email, Price, ProductId, UserId};

use crate::models::{Product, User};

/// (name, email, age) for the seeded accounts, ids `1..=5`.
const USERS: &[(&str, &str, u32)] = &[
    ("Daniel Silva", "daniel@example.com", 28),
    ("João Santos", "joao@example.com", 35),
    ("Maria Oliveira", "maria@example.com", 22),
    ("Ana Costa", "ana@example.com", 30),
    ("Carlos Ferreira", "carlos@example.com", 40),
];

/// (name, category, price in cents, stock, description, rating), ids `1..=10`.
const PRODUCTS: &[(&str, &str, i64, u32, &str, f64)] = &[
    ("iPhone 15 Pro", "smartphone", 499_999, 50, "Latest iPhone with advanced camera", 4.8),
    ("MacBook Pro M3", "laptop", 899_999, 30, "Professional laptop for developers", 4.9),
    ("AirPods Pro", "headphone", 129_999, 100, "Wireless earbuds with noise cancellation", 4.7),
    ("Sony A7R V", "camera", 1_599_999, 15, "Professional mirrorless camera", 4.6),
    ("Samsung OLED 65\"", "tv", 699_999, 25, "4K OLED Smart TV", 4.5),
    ("Apple Watch Series 9", "watch", 229_999, 75, "Advanced smartwatch with health monitoring", 4.7),
    ("iPad Pro 12.9\"", "tablet", 549_999, 40, "Professional tablet for creative work", 4.8),
    ("JBL Flip 6", "speaker", 69_999, 80, "Portable Bluetooth speaker", 4.4),
    ("Dell UltraSharp 27\"", "monitor", 219_999, 35, "4K professional monitor", 4.6),
    ("Logitech MX Master 3", "keyboard", 49_999, 60, "Wireless productivity mouse", 4.5),
];

/// The seeded accounts. Seed emails are known to be well formed.
#[must_use]
pub fn users() -> Vec<User> {
    USERS
        .iter()
        .zip(1u64..)
        .filter_map(|(&(name, email, age), seq)| {
            let email = Email::parse(email).ok()?;
            Some(User::new(UserId::from_seq(seq), name.to_string(), email, age))
        })
        .collect()
}

/// The seeded catalog.
#[must_use]
pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .zip(1u64..)
        .map(
            |(&(name, category, cents, stock, description, rating), seq)| Product {
                id: ProductId::from_seq(seq),
                name: name.to_string(),
                category: category.to_string(),
                price: Price::from_cents(cents),
                stock,
                description: description.to_string(),
                rating,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sizes() {
        assert_eq!(users().len(), USERS.len());
        assert_eq!(products().len(), PRODUCTS.len());
    }

    #[test]
    fn test_seed_ids_are_sequential() {
        let ids: Vec<String> = products().into_iter().map(|p| p.id.into_inner()).collect();
        assert_eq!(ids.first().map(String::as_str), Some("1"));
        assert_eq!(ids.last().map(String::as_str), Some("10"));
    }
}
