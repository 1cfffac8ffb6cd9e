use serde::{Deserialize, Serialize};

use bindery_model::{
    Book, BookFormat, BookStatus, CategoryID, PriceBand, StockBand,
};

/// Declarative book query consumed by `BookRepository::search`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookQuery {
    pub filters: BookFilters,
    pub sort: BookSort,
    /// Cap on the number of rows returned; `None` means unbounded.
    pub limit: Option<usize>,
}

impl BookQuery {
    /// Storefront listing: every purchasable book, title ascending.
    pub fn available_listing() -> Self {
        Self {
            filters: BookFilters {
                available_only: true,
                ..Default::default()
            },
            sort: BookSort::TitleAsc,
            limit: None,
        }
    }

    /// Storefront search over the listing. A blank query degrades to
    /// the plain listing.
    pub fn available_search(text: &str) -> Self {
        let mut query = Self::available_listing();
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            query.filters.title_contains = Some(trimmed.to_string());
        }
        query
    }
}

/// Book filtering options. Every populated filter must hold for a book
/// to match; all are composable with `available_only`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookFilters {
    /// Status is `available` and stock is positive.
    pub available_only: bool,
    pub featured: Option<bool>,
    pub bestseller: Option<bool>,
    pub new_arrival: Option<bool>,
    pub status: Option<BookStatus>,
    pub format: Option<BookFormat>,
    pub category: Option<CategoryID>,
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    pub stock_band: Option<StockBand>,
    pub price_band: Option<PriceBand>,
}

impl BookFilters {
    /// Whether a book satisfies every populated filter.
    ///
    /// This is the reference semantics; the Postgres adapter builds SQL
    /// predicates that must agree with it.
    pub fn matches(&self, book: &Book) -> bool {
        if self.available_only && !book.is_available() {
            return false;
        }
        if let Some(featured) = self.featured
            && book.featured != featured
        {
            return false;
        }
        if let Some(bestseller) = self.bestseller
            && book.bestseller != bestseller
        {
            return false;
        }
        if let Some(new_arrival) = self.new_arrival
            && book.new_arrival != new_arrival
        {
            return false;
        }
        if let Some(status) = self.status
            && book.status != status
        {
            return false;
        }
        if let Some(format) = self.format
            && book.format != format
        {
            return false;
        }
        if let Some(category) = self.category
            && book.category_id != Some(category)
        {
            return false;
        }
        if let Some(needle) = &self.title_contains
            && !book
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase())
        {
            return false;
        }
        if let Some(band) = self.stock_band
            && !band.contains(book.stock_quantity)
        {
            return false;
        }
        if let Some(band) = self.price_band
            && !band.contains(book.price)
        {
            return false;
        }
        true
    }
}

/// Sort order for book queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum BookSort {
    /// Newest first (creation time descending), the catalog default.
    #[default]
    CreatedDesc,
    /// Alphabetical by title, the storefront listing order.
    TitleAsc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_model::BookDraft;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn available_book(title: &str) -> Book {
        build(BookDraft {
            title: title.to_string(),
            description: "d".to_string(),
            stock_quantity: 10,
            ..Default::default()
        })
    }

    fn build(draft: BookDraft) -> Book {
        let now = Utc::now();
        Book {
            id: bindery_model::BookID::new(),
            title: draft.title,
            subtitle: draft.subtitle,
            isbn_10: draft.isbn_10,
            isbn_13: draft.isbn_13,
            description: draft.description,
            table_of_contents: draft.table_of_contents,
            language: draft.language,
            pages: draft.pages,
            weight: draft.weight,
            dimensions: draft.dimensions,
            price: draft.price,
            cost_price: draft.cost_price,
            discount_percentage: draft.discount_percentage,
            stock_quantity: draft.stock_quantity,
            min_stock_level: draft.min_stock_level,
            publication_date: draft.publication_date,
            edition: draft.edition,
            format: draft.format,
            status: draft.status,
            average_rating: Decimal::ZERO,
            total_reviews: 0,
            cover_image_url: draft.cover_image_url,
            sample_url: draft.sample_url,
            featured: draft.featured,
            bestseller: draft.bestseller,
            new_arrival: draft.new_arrival,
            tags: draft.tags,
            author_ids: draft.author_ids,
            publisher_id: draft.publisher_id,
            category_id: draft.category_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let book = available_book("The Left Hand of Darkness");
        let filters = BookFilters {
            title_contains: Some("LEFT hand".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&book));
    }

    #[test]
    fn available_only_excludes_zero_stock() {
        let mut book = available_book("Dune");
        book.stock_quantity = 0;
        let filters = BookFilters {
            available_only: true,
            ..Default::default()
        };
        assert!(!filters.matches(&book));
    }

    #[test]
    fn filters_compose() {
        let mut book = available_book("Dune");
        book.featured = true;
        let filters = BookFilters {
            available_only: true,
            featured: Some(true),
            title_contains: Some("dune".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&book));

        book.featured = false;
        assert!(!filters.matches(&book));
    }

    #[test]
    fn blank_search_degrades_to_listing() {
        let query = BookQuery::available_search("   ");
        assert!(query.filters.title_contains.is_none());
        assert_eq!(query.sort, BookSort::TitleAsc);
    }
}
