//! Product use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD and lookup entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::category::Category;
use crate::model::product::{Product, ProductId};
use crate::repo::product_query::ProductQuery;
use crate::repo::product_repo::{ProductRepository, RepoResult};
use rust_decimal::Decimal;

/// Use-case service wrapper for product operations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a transient product; the assigned id is written back.
    pub fn create(&self, product: &mut Product) -> RepoResult<ProductId> {
        self.repo.create(product)
    }

    /// Builds and persists a product from field values.
    ///
    /// Returns the persisted value with its assigned id.
    pub fn create_product(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> RepoResult<Product> {
        let mut product = Product::new(name, description, price, available, category);
        self.repo.create(&mut product)?;
        Ok(product)
    }

    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update(&self, product: &Product) -> RepoResult<()> {
        self.repo.update(product)
    }

    pub fn delete(&self, product: &Product) -> RepoResult<()> {
        self.repo.delete(product)
    }

    pub fn delete_by_id(&self, id: ProductId) -> RepoResult<()> {
        self.repo.delete_by_id(id)
    }

    pub fn find(&self, id: ProductId) -> RepoResult<Option<Product>> {
        self.repo.find(id)
    }

    pub fn all(&self) -> RepoResult<Vec<Product>> {
        self.repo.all()
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count()
    }

    pub fn find_by_name(&self, name: &str) -> ProductQuery<'_, R> {
        self.repo.find_by_name(name)
    }

    pub fn find_by_availability(&self, available: bool) -> ProductQuery<'_, R> {
        self.repo.find_by_availability(available)
    }

    pub fn find_by_category(&self, category: Category) -> ProductQuery<'_, R> {
        self.repo.find_by_category(category)
    }

    pub fn find_by_price(&self, price: Decimal) -> ProductQuery<'_, R> {
        self.repo.find_by_price(price)
    }
}
