//! Core domain logic for the product catalog.
//! This crate is the single source of truth for product persistence rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryParseError};
pub use model::product::{parse_price, Product, ProductId, ProductValidationError};
pub use repo::product_query::{ProductFilter, ProductIter, ProductQuery};
pub use repo::product_repo::{ProductRepository, RepoError, RepoResult, SqliteProductRepository};
pub use service::product_service::ProductService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
