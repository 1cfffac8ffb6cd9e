use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bindery_model::{Author, AuthorDraft, AuthorID};

use crate::{
    CatalogError, Result,
    database::{ports::AuthorRepository, postgres::internal},
};

#[derive(Clone, Debug)]
pub struct PostgresAuthorRepository {
    pool: PgPool,
}

impl PostgresAuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    bio: Option<String>,
    birth_date: Option<NaiveDate>,
    website: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author {
            id: AuthorID(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            birth_date: row.birth_date,
            website: row.website,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str =
    "id, first_name, last_name, bio, birth_date, website, created_at";

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn create(&self, draft: AuthorDraft) -> Result<Author> {
        let draft = draft.normalized();
        draft.validate()?;

        let row: AuthorRow = sqlx::query_as(
            "INSERT INTO authors
                (id, first_name, last_name, bio, birth_date, website, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, first_name, last_name, bio, birth_date, website, created_at",
        )
        .bind(Uuid::now_v7())
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.bio)
        .bind(draft.birth_date)
        .bind(&draft.website)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to create author", e))?;
        Ok(row.into())
    }

    async fn get(&self, id: AuthorID) -> Result<Option<Author>> {
        let row: Option<AuthorRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM authors WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to get author", e))?;
        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Author>> {
        let rows: Vec<AuthorRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM authors ORDER BY last_name, first_name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal("failed to list authors", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: AuthorID,
        draft: AuthorDraft,
    ) -> Result<Author> {
        let draft = draft.normalized();
        draft.validate()?;

        let row: Option<AuthorRow> = sqlx::query_as(
            "UPDATE authors
             SET first_name = $2, last_name = $3, bio = $4, birth_date = $5,
                 website = $6
             WHERE id = $1
             RETURNING id, first_name, last_name, bio, birth_date, website, created_at",
        )
        .bind(id.to_uuid())
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.bio)
        .bind(draft.birth_date)
        .bind(&draft.website)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to update author", e))?;
        row.map(Into::into)
            .ok_or_else(|| CatalogError::NotFound(format!("author {id}")))
    }

    async fn delete(&self, id: AuthorID) -> Result<()> {
        // Join rows cascade; the books themselves survive.
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id.to_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("failed to delete author", e))?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("author {id}")));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| internal("failed to count authors", e))?;
        Ok(count as u64)
    }

    async fn book_count(&self, id: AuthorID) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM book_authors WHERE author_id = $1",
        )
        .bind(id.to_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to count author books", e))?;
        Ok(count as u64)
    }
}
