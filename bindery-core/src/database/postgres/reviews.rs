use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bindery_model::{
    BookID, BookReview, ReviewDraft, ReviewID, ValidationError,
};

use crate::{
    CatalogError, Result,
    database::{ports::ReviewRepository, postgres::internal},
};

#[derive(Clone, Debug)]
pub struct PostgresReviewRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    book_id: Uuid,
    reviewer_name: String,
    reviewer_email: String,
    rating: i16,
    title: String,
    body: String,
    verified_purchase: bool,
    helpful_votes: i32,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for BookReview {
    fn from(row: ReviewRow) -> Self {
        BookReview {
            id: ReviewID(row.id),
            book_id: BookID(row.book_id),
            reviewer_name: row.reviewer_name,
            reviewer_email: row.reviewer_email,
            rating: row.rating.clamp(0, 5) as u8,
            title: row.title,
            body: row.body,
            verified_purchase: row.verified_purchase,
            helpful_votes: row.helpful_votes.max(0) as u32,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, book_id, reviewer_name, reviewer_email, rating, \
     title, body, verified_purchase, helpful_votes, created_at";

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recompute the owning book's stored aggregates inside the given
    /// transaction.
    async fn refresh_aggregates(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        book_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE books SET
                average_rating = COALESCE((
                    SELECT ROUND(AVG(rating), 2) FROM book_reviews
                    WHERE book_id = $1
                ), 0),
                total_reviews = (
                    SELECT COUNT(*) FROM book_reviews WHERE book_id = $1
                ),
                updated_at = $2
             WHERE id = $1",
        )
        .bind(book_id)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(|e| internal("failed to refresh book aggregates", e))?;
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, draft: ReviewDraft) -> Result<BookReview> {
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

        let (duplicate,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM book_reviews
                WHERE book_id = $1 AND reviewer_email = $2
            )",
        )
        .bind(draft.book_id.to_uuid())
        .bind(&draft.reviewer_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to check reviewer email", e))?;
        if duplicate {
            return Err(ValidationError::Unique {
                field: "reviewer_email",
                value: draft.reviewer_email,
            }
            .into());
        }

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal("failed to open transaction", e))?;

        let row: ReviewRow = sqlx::query_as(&format!(
            "INSERT INTO book_reviews
                (id, book_id, reviewer_name, reviewer_email, rating, title,
                 body, verified_purchase, helpful_votes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9)
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(draft.book_id.to_uuid())
        .bind(&draft.reviewer_name)
        .bind(&draft.reviewer_email)
        .bind(i16::from(draft.rating))
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(draft.verified_purchase)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| internal("failed to create review", e))?;

        Self::refresh_aggregates(&mut tx, draft.book_id.to_uuid(), now)
            .await?;
        tx.commit()
            .await
            .map_err(|e| internal("failed to commit review", e))?;
        Ok(row.into())
    }

    async fn list_for_book(&self, book_id: BookID) -> Result<Vec<BookReview>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM book_reviews
             WHERE book_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(book_id.to_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal("failed to list reviews", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: ReviewID) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal("failed to open transaction", e))?;

        let deleted: Option<(Uuid,)> = sqlx::query_as(
            "DELETE FROM book_reviews WHERE id = $1 RETURNING book_id",
        )
        .bind(id.to_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| internal("failed to delete review", e))?;

        let Some((book_id,)) = deleted else {
            return Err(CatalogError::NotFound(format!("review {id}")));
        };

        Self::refresh_aggregates(&mut tx, book_id, Utc::now()).await?;
        tx.commit()
            .await
            .map_err(|e| internal("failed to commit review delete", e))?;
        Ok(())
    }

    async fn mark_helpful(&self, id: ReviewID) -> Result<BookReview> {
        let row: Option<ReviewRow> = sqlx::query_as(&format!(
            "UPDATE book_reviews SET helpful_votes = helpful_votes + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to mark review helpful", e))?;
        row.map(Into::into)
            .ok_or_else(|| CatalogError::NotFound(format!("review {id}")))
    }
}
