use async_trait::async_trait;
use rust_decimal::Decimal;

use bindery_model::{Book, BookDetails, BookDraft, BookID};

use crate::{Result, query::BookQuery};

/// Repository port for the book aggregate.
///
/// Books own their reviews and images: deleting a book deletes both.
/// Author, publisher, and category references are non-owning.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new book. Validates the draft, enforces ISBN
    /// uniqueness, and links authors in draft order.
    async fn create(&self, draft: BookDraft) -> Result<Book>;

    async fn get(&self, id: BookID) -> Result<Option<Book>>;

    /// One book with its category and author list resolved.
    async fn get_detailed(&self, id: BookID) -> Result<Option<BookDetails>>;

    /// Replace the mutable fields of an existing book and refresh its
    /// update timestamp. Aggregate fields are left untouched.
    async fn update(&self, id: BookID, draft: BookDraft) -> Result<Book>;

    /// Delete the book, cascading to its reviews and images.
    async fn delete(&self, id: BookID) -> Result<()>;

    /// Filtered, sorted, optionally capped result set with category and
    /// authors eagerly resolved on every row.
    async fn search(&self, query: &BookQuery) -> Result<Vec<BookDetails>>;

    async fn count(&self) -> Result<u64>;

    // Bulk actions for the admin surface. Each applies uniformly to the
    // given subset and reports how many rows changed.
    async fn mark_featured(&self, ids: &[BookID]) -> Result<u64>;
    async fn mark_bestseller(&self, ids: &[BookID]) -> Result<u64>;
    async fn apply_discount(
        &self,
        ids: &[BookID],
        percentage: Decimal,
    ) -> Result<u64>;
}
