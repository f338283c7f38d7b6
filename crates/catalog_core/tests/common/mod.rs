//! Shared fixtures for integration tests.

#![allow(dead_code)]

use catalog_core::db::open_db_in_memory;
use catalog_core::{Category, Product, ProductRepository, SqliteProductRepository};
use rusqlite::Connection;
use rust_decimal::Decimal;

const NAMES: [(&str, Category); 11] = [
    ("Hat", Category::Cloths),
    ("Pants", Category::Cloths),
    ("Shirt", Category::Cloths),
    ("Apple", Category::Food),
    ("Banana", Category::Food),
    ("Pots", Category::Housewares),
    ("Towels", Category::Housewares),
    ("Ford", Category::Automotive),
    ("Chevy", Category::Automotive),
    ("Hammer", Category::Tools),
    ("Wrench", Category::Tools),
];

const PRICES: [i64; 5] = [50, 1250, 1999, 2500, 10000];

/// Builds valid products from a seeded pseudo-random sequence.
///
/// Pools are small on purpose so batches contain repeated names, prices,
/// categories and availability flags.
pub struct ProductFactory {
    state: u64,
}

impl ProductFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1),
        }
    }

    pub fn build(&mut self) -> Product {
        let (name, category) = NAMES[self.pick(NAMES.len())];
        let price = Decimal::new(PRICES[self.pick(PRICES.len())], 2);
        let available = self.pick(2) == 0;
        let description = format!("{name} number {}", self.pick(1000));
        Product::new(name, description, price, available, category)
    }

    pub fn build_batch(&mut self, count: usize) -> Vec<Product> {
        (0..count).map(|_| self.build()).collect()
    }

    /// Builds `count` products and persists each one.
    pub fn create_batch<R: ProductRepository>(&mut self, repo: &R, count: usize) -> Vec<Product> {
        let mut products = self.build_batch(count);
        for product in &mut products {
            repo.create(product).unwrap();
        }
        products
    }

    fn pick(&mut self, bound: usize) -> usize {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.state >> 33) % bound as u64) as usize
    }
}

pub fn open_store() -> Connection {
    open_db_in_memory().unwrap()
}

pub fn repo(conn: &Connection) -> SqliteProductRepository<'_> {
    SqliteProductRepository::try_new(conn).unwrap()
}

pub fn fedora() -> Product {
    Product::new(
        "Fedora",
        "A red hat",
        Decimal::new(1250, 2),
        true,
        Category::Cloths,
    )
}
