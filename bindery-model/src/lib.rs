//! Core catalog data model definitions shared across Bindery crates.
//!
//! Everything in this crate is persistence-agnostic: entities, their
//! validation rules, and derived values computed purely from entity
//! state. Infrastructure adapters own the mapping to database
//! representations.

pub mod author;
pub mod book;
pub mod category;
pub mod error;
pub mod filter_types;
pub mod ids;
pub mod image;
pub mod publisher;
pub mod review;

// Intentionally curated re-exports for downstream consumers.
pub use author::{Author, AuthorDraft};
pub use book::{
    Book, BookDetails, BookDraft, BookFormat, BookStatus, NO_AUTHORS,
};
pub use category::{Category, CategoryDraft};
pub use error::{Result as ModelResult, ValidationError};
pub use filter_types::{LOW_STOCK_CEILING, PriceBand, StockBand};
pub use ids::{AuthorID, BookID, CategoryID, ImageID, PublisherID, ReviewID};
pub use image::{BookImage, ImageDraft};
pub use publisher::{Publisher, PublisherDraft};
pub use review::{BookReview, ReviewDraft};

/// Collapse a blank optional string to `None`.
pub(crate) fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
