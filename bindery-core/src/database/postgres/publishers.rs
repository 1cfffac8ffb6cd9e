use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bindery_model::{Publisher, PublisherDraft, PublisherID, ValidationError};

use crate::{
    CatalogError, Result,
    database::{ports::PublisherRepository, postgres::internal},
};

#[derive(Clone, Debug)]
pub struct PostgresPublisherRepository {
    pool: PgPool,
}

impl PostgresPublisherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn name_taken(
        &self,
        name: &str,
        exclude: Option<PublisherID>,
    ) -> Result<bool> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM publishers WHERE name = $1 AND id IS DISTINCT FROM $2
            )",
        )
        .bind(name)
        .bind(exclude.map(|id| id.to_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to check publisher name", e))?;
        Ok(taken)
    }
}

#[derive(sqlx::FromRow)]
struct PublisherRow {
    id: Uuid,
    name: String,
    address: Option<String>,
    website: Option<String>,
    established_year: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<PublisherRow> for Publisher {
    fn from(row: PublisherRow) -> Self {
        Publisher {
            id: PublisherID(row.id),
            name: row.name,
            address: row.address,
            website: row.website,
            established_year: row.established_year,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str =
    "id, name, address, website, established_year, created_at";

#[async_trait]
impl PublisherRepository for PostgresPublisherRepository {
    async fn create(&self, draft: PublisherDraft) -> Result<Publisher> {
        let draft = draft.normalized();
        draft.validate()?;
        if self.name_taken(&draft.name, None).await? {
            return Err(ValidationError::Unique {
                field: "name",
                value: draft.name,
            }
            .into());
        }

        let row: PublisherRow = sqlx::query_as(
            "INSERT INTO publishers
                (id, name, address, website, established_year, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, name, address, website, established_year, created_at",
        )
        .bind(Uuid::now_v7())
        .bind(&draft.name)
        .bind(&draft.address)
        .bind(&draft.website)
        .bind(draft.established_year)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to create publisher", e))?;
        Ok(row.into())
    }

    async fn get(&self, id: PublisherID) -> Result<Option<Publisher>> {
        let row: Option<PublisherRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM publishers WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to get publisher", e))?;
        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Publisher>> {
        let rows: Vec<PublisherRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM publishers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal("failed to list publishers", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: PublisherID,
        draft: PublisherDraft,
    ) -> Result<Publisher> {
        let draft = draft.normalized();
        draft.validate()?;
        if self.name_taken(&draft.name, Some(id)).await? {
            return Err(ValidationError::Unique {
                field: "name",
                value: draft.name,
            }
            .into());
        }

        let row: Option<PublisherRow> = sqlx::query_as(
            "UPDATE publishers
             SET name = $2, address = $3, website = $4, established_year = $5
             WHERE id = $1
             RETURNING id, name, address, website, established_year, created_at",
        )
        .bind(id.to_uuid())
        .bind(&draft.name)
        .bind(&draft.address)
        .bind(&draft.website)
        .bind(draft.established_year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to update publisher", e))?;
        row.map(Into::into)
            .ok_or_else(|| CatalogError::NotFound(format!("publisher {id}")))
    }

    async fn delete(&self, id: PublisherID) -> Result<()> {
        // ON DELETE SET NULL clears the reference on books.
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id.to_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("failed to delete publisher", e))?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("publisher {id}")));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM publishers")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| internal("failed to count publishers", e))?;
        Ok(count as u64)
    }

    async fn book_count(&self, id: PublisherID) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM books WHERE publisher_id = $1",
        )
        .bind(id.to_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to count publisher books", e))?;
        Ok(count as u64)
    }
}
