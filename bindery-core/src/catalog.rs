use std::sync::Arc;

use sqlx::PgPool;

use crate::database::{
    memory::MemoryCatalog,
    ports::{
        AuthorRepository, BookRepository, CategoryRepository,
        ImageRepository, PublisherRepository, ReviewRepository,
    },
    postgres::{
        PostgresAuthorRepository, PostgresBookRepository,
        PostgresCategoryRepository, PostgresImageRepository,
        PostgresPublisherRepository, PostgresReviewRepository,
    },
};

/// The catalog's repositories, grouped for handler wiring.
///
/// All handles are `Arc`'d trait objects so the same `Catalog` value
/// can be cloned into every consumer regardless of the backing store.
#[derive(Clone)]
pub struct Catalog {
    pub categories: Arc<dyn CategoryRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub publishers: Arc<dyn PublisherRepository>,
    pub books: Arc<dyn BookRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub images: Arc<dyn ImageRepository>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

impl Catalog {
    /// Wire every repository to a Postgres pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            authors: Arc::new(PostgresAuthorRepository::new(pool.clone())),
            publishers: Arc::new(PostgresPublisherRepository::new(
                pool.clone(),
            )),
            books: Arc::new(PostgresBookRepository::new(pool.clone())),
            reviews: Arc::new(PostgresReviewRepository::new(pool.clone())),
            images: Arc::new(PostgresImageRepository::new(pool)),
        }
    }

    /// Wire every repository to a fresh shared in-memory store. Used by
    /// demo mode and the test suites.
    pub fn memory() -> Self {
        MemoryCatalog::new().into_catalog()
    }
}
