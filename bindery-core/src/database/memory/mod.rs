//! In-memory catalog backend.
//!
//! Implements every repository port over shared hash-map tables with
//! the same semantics as the Postgres adapter: uniqueness checks,
//! cascade and nullify rules, repository-owned timestamps, and review
//! aggregates. Backs demo mode and the DB-free test suites.

mod authors;
mod books;
mod categories;
mod images;
mod publishers;
mod reviews;

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bindery_model::{
    Author, AuthorID, Book, BookID, BookImage, BookReview, Category,
    CategoryID, ImageID, Publisher, PublisherID, ReviewID,
};

pub use authors::MemoryAuthorRepository;
pub use books::MemoryBookRepository;
pub use categories::MemoryCategoryRepository;
pub use images::MemoryImageRepository;
pub use publishers::MemoryPublisherRepository;
pub use reviews::MemoryReviewRepository;

use crate::catalog::Catalog;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub categories: HashMap<CategoryID, Category>,
    pub authors: HashMap<AuthorID, Author>,
    pub publishers: HashMap<PublisherID, Publisher>,
    pub books: HashMap<BookID, Book>,
    pub reviews: HashMap<ReviewID, BookReview>,
    pub images: HashMap<ImageID, BookImage>,
}

pub(crate) type Shared = Arc<RwLock<Tables>>;

// Critical sections never hold the guard across an await, so poisoning
// can only come from a panicking test; recover rather than propagate.
pub(crate) fn read(shared: &Shared) -> RwLockReadGuard<'_, Tables> {
    shared.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write(shared: &Shared) -> RwLockWriteGuard<'_, Tables> {
    shared.write().unwrap_or_else(PoisonError::into_inner)
}

/// Recompute a book's stored review aggregates from its review set.
pub(crate) fn refresh_book_aggregates(
    tables: &mut Tables,
    book_id: BookID,
    now: DateTime<Utc>,
) {
    let ratings: Vec<u32> = tables
        .reviews
        .values()
        .filter(|review| review.book_id == book_id)
        .map(|review| u32::from(review.rating))
        .collect();

    if let Some(book) = tables.books.get_mut(&book_id) {
        book.total_reviews = ratings.len() as u32;
        book.average_rating = if ratings.is_empty() {
            Decimal::ZERO
        } else {
            (Decimal::from(ratings.iter().sum::<u32>())
                / Decimal::from(ratings.len() as u32))
            .round_dp(2)
        };
        book.updated_at = now;
    }
}

/// Factory for a fresh in-memory catalog.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    shared: Shared,
}

impl std::fmt::Debug for MemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCatalog").finish_non_exhaustive()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Package the shared tables as a [`Catalog`] of repository handles.
    pub fn into_catalog(self) -> Catalog {
        Catalog {
            categories: Arc::new(MemoryCategoryRepository::new(
                self.shared.clone(),
            )),
            authors: Arc::new(MemoryAuthorRepository::new(self.shared.clone())),
            publishers: Arc::new(MemoryPublisherRepository::new(
                self.shared.clone(),
            )),
            books: Arc::new(MemoryBookRepository::new(self.shared.clone())),
            reviews: Arc::new(MemoryReviewRepository::new(self.shared.clone())),
            images: Arc::new(MemoryImageRepository::new(self.shared)),
        }
    }
}
