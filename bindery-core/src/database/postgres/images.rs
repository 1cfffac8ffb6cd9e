use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bindery_model::{BookID, BookImage, ImageDraft, ImageID};

use crate::{
    CatalogError, Result,
    database::{ports::ImageRepository, postgres::internal},
};

#[derive(Clone, Debug)]
pub struct PostgresImageRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    book_id: Uuid,
    image_url: String,
    alt_text: Option<String>,
    is_primary: bool,
    created_at: DateTime<Utc>,
}

impl From<ImageRow> for BookImage {
    fn from(row: ImageRow) -> Self {
        BookImage {
            id: ImageID(row.id),
            book_id: BookID(row.book_id),
            image_url: row.image_url,
            alt_text: row.alt_text,
            is_primary: row.is_primary,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str =
    "id, book_id, image_url, alt_text, is_primary, created_at";

impl PostgresImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PostgresImageRepository {
    async fn add(&self, draft: ImageDraft) -> Result<BookImage> {
        let draft = draft.normalized();
        draft.validate()?;

        let (book_exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM books WHERE id = $1)",
        )
        .bind(draft.book_id.to_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to check book", e))?;
        if !book_exists {
            return Err(CatalogError::NotFound(format!(
                "book {}",
                draft.book_id
            )));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal("failed to open transaction", e))?;

        if draft.is_primary {
            sqlx::query(
                "UPDATE book_images SET is_primary = FALSE WHERE book_id = $1",
            )
            .bind(draft.book_id.to_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| internal("failed to demote primary image", e))?;
        }

        let row: ImageRow = sqlx::query_as(&format!(
            "INSERT INTO book_images
                (id, book_id, image_url, alt_text, is_primary, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(draft.book_id.to_uuid())
        .bind(&draft.image_url)
        .bind(&draft.alt_text)
        .bind(draft.is_primary)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| internal("failed to add image", e))?;

        tx.commit()
            .await
            .map_err(|e| internal("failed to commit image", e))?;
        Ok(row.into())
    }

    async fn list_for_book(&self, book_id: BookID) -> Result<Vec<BookImage>> {
        let rows: Vec<ImageRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM book_images
             WHERE book_id = $1
             ORDER BY is_primary DESC, created_at ASC"
        ))
        .bind(book_id.to_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal("failed to list images", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_primary(&self, id: ImageID) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal("failed to open transaction", e))?;

        let book_id: Option<(Uuid,)> = sqlx::query_as(
            "SELECT book_id FROM book_images WHERE id = $1",
        )
        .bind(id.to_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| internal("failed to get image", e))?;
        let Some((book_id,)) = book_id else {
            return Err(CatalogError::NotFound(format!("image {id}")));
        };

        sqlx::query(
            "UPDATE book_images SET is_primary = (id = $2) WHERE book_id = $1",
        )
        .bind(book_id)
        .bind(id.to_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| internal("failed to promote image", e))?;

        tx.commit()
            .await
            .map_err(|e| internal("failed to commit primary image", e))?;
        Ok(())
    }

    async fn delete(&self, id: ImageID) -> Result<()> {
        let result = sqlx::query("DELETE FROM book_images WHERE id = $1")
            .bind(id.to_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("failed to delete image", e))?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("image {id}")));
        }
        Ok(())
    }
}
