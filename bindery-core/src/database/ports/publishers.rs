use async_trait::async_trait;

use bindery_model::{Publisher, PublisherDraft, PublisherID};

use crate::Result;

/// Repository port for publisher reference data.
///
/// Deleting a publisher nullifies the publisher reference on books.
#[async_trait]
pub trait PublisherRepository: Send + Sync {
    /// Insert a new publisher. Rejects a duplicate name with a
    /// uniqueness `ValidationError`.
    async fn create(&self, draft: PublisherDraft) -> Result<Publisher>;

    async fn get(&self, id: PublisherID) -> Result<Option<Publisher>>;

    /// All publishers, name ascending.
    async fn list(&self) -> Result<Vec<Publisher>>;

    async fn update(
        &self,
        id: PublisherID,
        draft: PublisherDraft,
    ) -> Result<Publisher>;

    async fn delete(&self, id: PublisherID) -> Result<()>;

    async fn count(&self) -> Result<u64>;

    async fn book_count(&self, id: PublisherID) -> Result<u64>;
}
