use async_trait::async_trait;

use bindery_model::{BookID, BookReview, ReviewDraft, ReviewID};

use crate::Result;

/// Repository port for book reviews.
///
/// Creating or deleting a review refreshes the owning book's stored
/// `average_rating` and `total_reviews` aggregates in the same
/// operation.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review. Rejects a second review from the same email for
    /// the same book with a uniqueness `ValidationError`.
    async fn create(&self, draft: ReviewDraft) -> Result<BookReview>;

    /// Reviews for a book, newest first.
    async fn list_for_book(&self, book_id: BookID) -> Result<Vec<BookReview>>;

    async fn delete(&self, id: ReviewID) -> Result<()>;

    /// Bump the helpful-vote counter by one.
    async fn mark_helpful(&self, id: ReviewID) -> Result<BookReview>;
}
