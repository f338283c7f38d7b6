//! Lazy single-field product queries.
//!
//! # Responsibility
//! - Describe a filtered product scan without running it.
//! - Stream matching rows in id order, one page at a time.
//!
//! # Invariants
//! - A `ProductQuery` never mutates the store.
//! - Each `iter()` call re-issues the query from the first row.
//! - Iteration stops after the first error.

use crate::model::category::Category;
use crate::model::product::{Product, ProductId};
use crate::repo::product_repo::{ProductRepository, RepoResult};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Rows fetched per round trip while iterating.
pub const DEFAULT_BATCH_SIZE: u32 = 64;

/// Single-field equality predicate over `products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    All,
    Name(String),
    Available(bool),
    Category(Category),
    Price(Decimal),
}

impl ProductFilter {
    /// Returns whether an in-memory product satisfies this predicate.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Name(name) => product.name == *name,
            Self::Available(available) => product.available == *available,
            Self::Category(category) => product.category == *category,
            Self::Price(price) => product.price == *price,
        }
    }
}

/// Deferred query over one repository.
pub struct ProductQuery<'repo, R: ProductRepository> {
    repo: &'repo R,
    filter: ProductFilter,
    batch_size: u32,
}

impl<'repo, R: ProductRepository> ProductQuery<'repo, R> {
    pub fn new(repo: &'repo R, filter: ProductFilter) -> Self {
        Self {
            repo,
            filter,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Overrides the page size used by `iter()`. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Counts matching rows without loading them.
    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_matching(&self.filter)
    }

    /// Starts a fresh pass over the matching rows.
    pub fn iter(&self) -> ProductIter<'_, R> {
        ProductIter {
            repo: self.repo,
            filter: &self.filter,
            batch_size: self.batch_size,
            after_id: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Loads every matching row.
    pub fn fetch_all(&self) -> RepoResult<Vec<Product>> {
        self.iter().collect()
    }
}

impl<'query, R: ProductRepository> IntoIterator for &'query ProductQuery<'_, R> {
    type Item = RepoResult<Product>;
    type IntoIter = ProductIter<'query, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keyset-paged iterator over a `ProductQuery`.
pub struct ProductIter<'query, R: ProductRepository> {
    repo: &'query R,
    filter: &'query ProductFilter,
    batch_size: u32,
    after_id: Option<ProductId>,
    buffer: VecDeque<Product>,
    exhausted: bool,
}

impl<R: ProductRepository> Iterator for ProductIter<'_, R> {
    type Item = RepoResult<Product>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            match self
                .repo
                .fetch_page(self.filter, self.after_id, self.batch_size)
            {
                Ok(page) => {
                    if page.len() < self.batch_size as usize {
                        self.exhausted = true;
                    }
                    if let Some(last) = page.last() {
                        self.after_id = last.id;
                    }
                    self.buffer.extend(page);
                }
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(err));
                }
            }
        }

        self.buffer.pop_front().map(Ok)
    }
}
