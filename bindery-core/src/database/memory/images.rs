use async_trait::async_trait;
use chrono::Utc;

use bindery_model::{BookID, BookImage, ImageDraft, ImageID, image};

use crate::{
    CatalogError, Result,
    database::{
        memory::{Shared, read, write},
        ports::ImageRepository,
    },
};

#[derive(Clone, Debug)]
pub struct MemoryImageRepository {
    shared: Shared,
}

impl MemoryImageRepository {
    pub(crate) fn new(shared: Shared) -> Self {
        Self { shared }
    }
}

#[async_trait]
impl ImageRepository for MemoryImageRepository {
    async fn add(&self, draft: ImageDraft) -> Result<BookImage> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut tables = write(&self.shared);
        if !tables.books.contains_key(&draft.book_id) {
            return Err(CatalogError::NotFound(format!(
                "book {}",
                draft.book_id
            )));
        }
        if draft.is_primary {
            for image in tables.images.values_mut() {
                if image.book_id == draft.book_id {
                    image.is_primary = false;
                }
            }
        }

        let image = BookImage {
            id: ImageID::new(),
            book_id: draft.book_id,
            image_url: draft.image_url,
            alt_text: draft.alt_text,
            is_primary: draft.is_primary,
            created_at: Utc::now(),
        };
        tables.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn list_for_book(&self, book_id: BookID) -> Result<Vec<BookImage>> {
        let mut images: Vec<BookImage> = read(&self.shared)
            .images
            .values()
            .filter(|image| image.book_id == book_id)
            .cloned()
            .collect();
        image::gallery_order(&mut images);
        Ok(images)
    }

    async fn set_primary(&self, id: ImageID) -> Result<()> {
        let mut tables = write(&self.shared);
        let book_id = tables
            .images
            .get(&id)
            .map(|image| image.book_id)
            .ok_or_else(|| CatalogError::NotFound(format!("image {id}")))?;
        for image in tables.images.values_mut() {
            if image.book_id == book_id {
                image.is_primary = image.id == id;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: ImageID) -> Result<()> {
        if write(&self.shared).images.remove(&id).is_none() {
            return Err(CatalogError::NotFound(format!("image {id}")));
        }
        Ok(())
    }
}
