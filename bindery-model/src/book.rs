use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    author::Author,
    category::Category,
    error::{self, Result, ValidationError},
    ids::{AuthorID, BookID, CategoryID, PublisherID},
    none_if_blank,
};

pub const BOOK_TITLE_MAX: usize = 300;
pub const BOOK_SUBTITLE_MAX: usize = 300;
pub const ISBN_10_MAX: usize = 10;
pub const ISBN_13_MAX: usize = 13;
pub const DIMENSIONS_MAX: usize = 50;
pub const EDITION_MAX: usize = 50;
pub const TAGS_MAX: usize = 500;

/// Default reorder threshold for new books.
pub const DEFAULT_MIN_STOCK_LEVEL: u32 = 5;

/// Sentinel shown when a book has no linked authors.
pub const NO_AUTHORS: &str = "No authors";

/// Physical or digital format of a book.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BookFormat {
    Hardcover,
    #[default]
    Paperback,
    Ebook,
    Audiobook,
}

impl BookFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookFormat::Hardcover => "hardcover",
            BookFormat::Paperback => "paperback",
            BookFormat::Ebook => "ebook",
            BookFormat::Audiobook => "audiobook",
        }
    }
}

impl std::str::FromStr for BookFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hardcover" => Ok(BookFormat::Hardcover),
            "paperback" => Ok(BookFormat::Paperback),
            "ebook" => Ok(BookFormat::Ebook),
            "audiobook" => Ok(BookFormat::Audiobook),
            other => Err(ValidationError::OutOfRange {
                field: "format",
                message: format!("unknown format `{other}`"),
            }),
        }
    }
}

impl std::fmt::Display for BookFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sale status of a book.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    #[default]
    Available,
    OutOfStock,
    Discontinued,
    PreOrder,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::OutOfStock => "out_of_stock",
            BookStatus::Discontinued => "discontinued",
            BookStatus::PreOrder => "pre_order",
        }
    }
}

impl std::str::FromStr for BookStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "available" => Ok(BookStatus::Available),
            "out_of_stock" => Ok(BookStatus::OutOfStock),
            "discontinued" => Ok(BookStatus::Discontinued),
            "pre_order" => Ok(BookStatus::PreOrder),
            other => Err(ValidationError::OutOfRange {
                field: "status",
                message: format!("unknown status `{other}`"),
            }),
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The catalog aggregate root.
///
/// Owns the lifecycle of its reviews and images; holds non-owning
/// references to authors, publisher, and category. Monetary fields use
/// [`Decimal`] so derived prices never accumulate floating-point drift.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Book {
    pub id: BookID,
    pub title: String,
    pub subtitle: Option<String>,
    pub isbn_10: Option<String>,
    pub isbn_13: Option<String>,
    pub description: String,
    pub table_of_contents: Option<String>,
    pub language: String,
    pub pages: Option<u32>,
    /// Weight in grams.
    pub weight: Option<Decimal>,
    pub dimensions: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub discount_percentage: Decimal,
    pub stock_quantity: u32,
    pub min_stock_level: u32,
    pub publication_date: Option<NaiveDate>,
    pub edition: Option<String>,
    pub format: BookFormat,
    pub status: BookStatus,
    /// Stored aggregate, refreshed by the review repository.
    pub average_rating: Decimal,
    /// Stored aggregate, refreshed by the review repository.
    pub total_reviews: u32,
    pub cover_image_url: Option<String>,
    pub sample_url: Option<String>,
    pub featured: bool,
    pub bestseller: bool,
    pub new_arrival: bool,
    /// Comma-separated free-text tags.
    pub tags: Option<String>,
    /// Linked authors in association order.
    pub author_ids: Vec<AuthorID>,
    pub publisher_id: Option<PublisherID>,
    pub category_id: Option<CategoryID>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Price after discount. Equals `price` when no discount is set.
    pub fn discounted_price(&self) -> Decimal {
        if self.discount_percentage > Decimal::ZERO {
            let discount_amount =
                (self.price * self.discount_percentage) / Decimal::ONE_HUNDRED;
            self.price - discount_amount
        } else {
            self.price
        }
    }

    /// Whether stock has fallen to the book's own reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock_level
    }

    /// Whether the book can be purchased right now.
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available && self.stock_quantity > 0
    }
}

/// Payload for creating or replacing a book.
///
/// Aggregate fields (`average_rating`, `total_reviews`) and timestamps
/// are repository-owned and intentionally absent.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub subtitle: Option<String>,
    pub isbn_10: Option<String>,
    pub isbn_13: Option<String>,
    pub description: String,
    pub table_of_contents: Option<String>,
    pub language: String,
    pub pages: Option<u32>,
    pub weight: Option<Decimal>,
    pub dimensions: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub discount_percentage: Decimal,
    pub stock_quantity: u32,
    pub min_stock_level: u32,
    pub publication_date: Option<NaiveDate>,
    pub edition: Option<String>,
    pub format: BookFormat,
    pub status: BookStatus,
    pub cover_image_url: Option<String>,
    pub sample_url: Option<String>,
    pub featured: bool,
    pub bestseller: bool,
    pub new_arrival: bool,
    pub tags: Option<String>,
    pub author_ids: Vec<AuthorID>,
    pub publisher_id: Option<PublisherID>,
    pub category_id: Option<CategoryID>,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: None,
            isbn_10: None,
            isbn_13: None,
            description: String::new(),
            table_of_contents: None,
            language: "English".to_string(),
            pages: None,
            weight: None,
            dimensions: None,
            price: Decimal::ZERO,
            cost_price: None,
            discount_percentage: Decimal::ZERO,
            stock_quantity: 0,
            min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
            publication_date: None,
            edition: None,
            format: BookFormat::default(),
            status: BookStatus::default(),
            cover_image_url: None,
            sample_url: None,
            featured: false,
            bestseller: false,
            new_arrival: false,
            tags: None,
            author_ids: Vec::new(),
            publisher_id: None,
            category_id: None,
        }
    }
}

impl BookDraft {
    /// Collapse blank optional fields to `None`.
    ///
    /// In particular a blank ISBN becomes absent, so it never
    /// participates in uniqueness checks.
    pub fn normalized(mut self) -> Self {
        self.subtitle = none_if_blank(self.subtitle);
        self.isbn_10 = none_if_blank(self.isbn_10);
        self.isbn_13 = none_if_blank(self.isbn_13);
        self.table_of_contents = none_if_blank(self.table_of_contents);
        self.dimensions = none_if_blank(self.dimensions);
        self.edition = none_if_blank(self.edition);
        self.cover_image_url = none_if_blank(self.cover_image_url);
        self.sample_url = none_if_blank(self.sample_url);
        self.tags = none_if_blank(self.tags);
        self
    }

    pub fn validate(&self) -> Result<()> {
        error::require("title", &self.title)?;
        error::max_len("title", &self.title, BOOK_TITLE_MAX)?;
        error::require("description", &self.description)?;
        if let Some(subtitle) = &self.subtitle {
            error::max_len("subtitle", subtitle, BOOK_SUBTITLE_MAX)?;
        }
        if let Some(isbn) = &self.isbn_10 {
            error::max_len("isbn_10", isbn, ISBN_10_MAX)?;
        }
        if let Some(isbn) = &self.isbn_13 {
            error::max_len("isbn_13", isbn, ISBN_13_MAX)?;
        }
        if let Some(dimensions) = &self.dimensions {
            error::max_len("dimensions", dimensions, DIMENSIONS_MAX)?;
        }
        if let Some(edition) = &self.edition {
            error::max_len("edition", edition, EDITION_MAX)?;
        }
        if let Some(tags) = &self.tags {
            error::max_len("tags", tags, TAGS_MAX)?;
        }
        if self.price < Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field: "price",
                message: format!("{} is negative", self.price),
            });
        }
        if self.discount_percentage < Decimal::ZERO
            || self.discount_percentage > Decimal::ONE_HUNDRED
        {
            return Err(ValidationError::OutOfRange {
                field: "discount_percentage",
                message: format!(
                    "{} is outside 0..=100",
                    self.discount_percentage
                ),
            });
        }
        Ok(())
    }
}

/// A book with its category and author list already resolved.
///
/// Listing queries return these so consumers never issue per-row
/// association lookups.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BookDetails {
    pub book: Book,
    /// Authors in the order they were associated with the book.
    pub authors: Vec<Author>,
    pub category: Option<Category>,
}

impl BookDetails {
    /// Comma-joined author full names in association order, or the
    /// [`NO_AUTHORS`] sentinel when the book has none.
    pub fn display_authors(&self) -> String {
        if self.authors.is_empty() {
            return NO_AUTHORS.to_string();
        }
        self.authors
            .iter()
            .map(Author::full_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
