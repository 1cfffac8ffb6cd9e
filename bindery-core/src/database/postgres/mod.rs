//! Postgres catalog backend.
//!
//! Uses runtime-checked queries so the crate builds without a live
//! database; schema lives in the embedded migrations. Uniqueness is
//! pre-checked for precise `ValidationError`s, with the SQL constraints
//! as the transactional backstop.

mod authors;
mod books;
mod categories;
mod images;
mod publishers;
mod reviews;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

pub use authors::PostgresAuthorRepository;
pub use books::PostgresBookRepository;
pub use categories::PostgresCategoryRepository;
pub use images::PostgresImageRepository;
pub use publishers::PostgresPublisherRepository;
pub use reviews::PostgresReviewRepository;

use crate::{CatalogError, MIGRATOR, Result};

/// Connection handle for the catalog database.
#[derive(Clone, Debug)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Connect with a small default pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "failed to connect to PostgreSQL: {e}"
                ))
            })?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply any pending embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.map_err(|e| {
            CatalogError::Internal(format!("migration failed: {e}"))
        })?;
        info!("database migrations applied");
        Ok(())
    }
}

/// Wrap a driver error with operation context.
pub(crate) fn internal(context: &str, err: sqlx::Error) -> CatalogError {
    CatalogError::Internal(format!("{context}: {err}"))
}
