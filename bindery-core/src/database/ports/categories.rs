use async_trait::async_trait;

use bindery_model::{Category, CategoryDraft, CategoryID};

use crate::Result;

/// Repository port for category reference data.
///
/// Categories never cascade: deleting one clears the category reference
/// on any book that pointed at it.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a new category. Rejects a duplicate name with a
    /// uniqueness `ValidationError`.
    async fn create(&self, draft: CategoryDraft) -> Result<Category>;

    async fn get(&self, id: CategoryID) -> Result<Option<Category>>;

    /// All categories, name ascending.
    async fn list(&self) -> Result<Vec<Category>>;

    /// Replace the mutable fields of an existing category.
    async fn update(
        &self,
        id: CategoryID,
        draft: CategoryDraft,
    ) -> Result<Category>;

    /// Delete the category and nullify references on books.
    async fn delete(&self, id: CategoryID) -> Result<()>;

    async fn count(&self) -> Result<u64>;

    /// Number of books currently referencing this category.
    async fn book_count(&self, id: CategoryID) -> Result<u64>;
}
