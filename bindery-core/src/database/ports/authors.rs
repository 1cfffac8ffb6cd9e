use async_trait::async_trait;

use bindery_model::{Author, AuthorDraft, AuthorID};

use crate::Result;

/// Repository port for author reference data.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn create(&self, draft: AuthorDraft) -> Result<Author>;

    async fn get(&self, id: AuthorID) -> Result<Option<Author>>;

    /// All authors, ordered by last name then first name.
    async fn list(&self) -> Result<Vec<Author>>;

    async fn update(&self, id: AuthorID, draft: AuthorDraft)
    -> Result<Author>;

    /// Delete the author and detach them from any books.
    async fn delete(&self, id: AuthorID) -> Result<()>;

    async fn count(&self) -> Result<u64>;

    /// Number of books this author is linked to.
    async fn book_count(&self, id: AuthorID) -> Result<u64>;
}
