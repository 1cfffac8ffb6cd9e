//! Read-oriented query assembly for the public storefront.

use serde::{Deserialize, Serialize};

use bindery_model::BookDetails;

use crate::{
    Result,
    catalog::Catalog,
    query::types::{BookFilters, BookQuery, BookSort},
};

/// Cap on each shelf of the home page.
pub const HOME_SHELF_LIMIT: usize = 6;

/// Aggregate counts plus the three bounded home-page shelves.
///
/// Every shelf row carries its category and author list, so rendering
/// never goes back to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePage {
    pub total_books: u64,
    pub total_authors: u64,
    pub total_categories: u64,
    pub featured: Vec<BookDetails>,
    pub new_arrivals: Vec<BookDetails>,
    pub bestsellers: Vec<BookDetails>,
}

/// Storefront query service over the catalog repositories.
#[derive(Clone)]
pub struct Storefront {
    catalog: Catalog,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront").finish_non_exhaustive()
    }
}

impl Storefront {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Home/dashboard view: catalog totals plus up to six featured,
    /// six most recent, and six bestselling available books.
    pub async fn home(&self) -> Result<HomePage> {
        let total_books = self.catalog.books.count().await?;
        let total_authors = self.catalog.authors.count().await?;
        let total_categories = self.catalog.categories.count().await?;

        let featured = self.shelf(|filters| filters.featured = Some(true)).await?;
        let new_arrivals = self.shelf(|_| {}).await?;
        let bestsellers =
            self.shelf(|filters| filters.bestseller = Some(true)).await?;

        Ok(HomePage {
            total_books,
            total_authors,
            total_categories,
            featured,
            new_arrivals,
            bestsellers,
        })
    }

    /// Every available book, title ascending.
    pub async fn listing(&self) -> Result<Vec<BookDetails>> {
        self.catalog
            .books
            .search(&BookQuery::available_listing())
            .await
    }

    /// Available books whose title contains `query` case-insensitively.
    /// An empty or absent query returns the unfiltered listing; an
    /// empty result set is not an error.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<BookDetails>> {
        let query = BookQuery::available_search(query.unwrap_or(""));
        self.catalog.books.search(&query).await
    }

    /// One home shelf: available books, newest first, capped at six,
    /// with the given extra filter applied.
    async fn shelf(
        &self,
        refine: impl FnOnce(&mut BookFilters),
    ) -> Result<Vec<BookDetails>> {
        let mut query = BookQuery {
            filters: BookFilters {
                available_only: true,
                ..Default::default()
            },
            sort: BookSort::CreatedDesc,
            limit: Some(HOME_SHELF_LIMIT),
        };
        refine(&mut query.filters);
        self.catalog.books.search(&query).await
    }
}
