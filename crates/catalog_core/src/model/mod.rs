//! Product catalog domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core persistence logic.
//!
//! # Invariants
//! - A product is identified by a store-assigned `ProductId` once persisted.
//! - Deletion removes the row; there are no soft-delete tombstones.

pub mod category;
pub mod product;
