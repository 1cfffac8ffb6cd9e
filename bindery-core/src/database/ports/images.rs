use async_trait::async_trait;

use bindery_model::{BookID, BookImage, ImageDraft, ImageID};

use crate::Result;

/// Repository port for book gallery images.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Attach an image to a book. When the draft is marked primary, any
    /// existing primary image of that book is demoted.
    async fn add(&self, draft: ImageDraft) -> Result<BookImage>;

    /// Images for a book: primary first, then oldest upload first.
    async fn list_for_book(&self, book_id: BookID) -> Result<Vec<BookImage>>;

    /// Promote an image to primary, demoting any sibling primary.
    async fn set_primary(&self, id: ImageID) -> Result<()>;

    async fn delete(&self, id: ImageID) -> Result<()>;
}
