use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bindery_model::{Category, CategoryDraft, CategoryID, ValidationError};

use crate::{
    CatalogError, Result,
    database::{ports::CategoryRepository, postgres::internal},
};

#[derive(Clone, Debug)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn name_taken(
        &self,
        name: &str,
        exclude: Option<CategoryID>,
    ) -> Result<bool> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM categories WHERE name = $1 AND id IS DISTINCT FROM $2
            )",
        )
        .bind(name)
        .bind(exclude.map(|id| id.to_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to check category name", e))?;
        Ok(taken)
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryID(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, name, description, created_at";

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, draft: CategoryDraft) -> Result<Category> {
        let draft = draft.normalized();
        draft.validate()?;
        if self.name_taken(&draft.name, None).await? {
            return Err(ValidationError::Unique {
                field: "name",
                value: draft.name,
            }
            .into());
        }

        let row: CategoryRow = sqlx::query_as(
            "INSERT INTO categories (id, name, description, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, created_at",
        )
        .bind(Uuid::now_v7())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to create category", e))?;
        Ok(row.into())
    }

    async fn get(&self, id: CategoryID) -> Result<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to get category", e))?;
        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM categories ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal("failed to list categories", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: CategoryID,
        draft: CategoryDraft,
    ) -> Result<Category> {
        let draft = draft.normalized();
        draft.validate()?;
        if self.name_taken(&draft.name, Some(id)).await? {
            return Err(ValidationError::Unique {
                field: "name",
                value: draft.name,
            }
            .into());
        }

        let row: Option<CategoryRow> = sqlx::query_as(
            "UPDATE categories SET name = $2, description = $3
             WHERE id = $1
             RETURNING id, name, description, created_at",
        )
        .bind(id.to_uuid())
        .bind(&draft.name)
        .bind(&draft.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to update category", e))?;
        row.map(Into::into)
            .ok_or_else(|| CatalogError::NotFound(format!("category {id}")))
    }

    async fn delete(&self, id: CategoryID) -> Result<()> {
        // ON DELETE SET NULL detaches referencing books.
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.to_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("failed to delete category", e))?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("category {id}")));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM categories")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| internal("failed to count categories", e))?;
        Ok(count as u64)
    }

    async fn book_count(&self, id: CategoryID) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM books WHERE category_id = $1",
        )
        .bind(id.to_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to count category books", e))?;
        Ok(count as u64)
    }
}
