use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use bindery_model::{
    Author, AuthorID, Book, BookDetails, BookDraft, BookID, Category,
    CategoryID, LOW_STOCK_CEILING, PublisherID, StockBand, ValidationError,
};

use crate::{
    CatalogError, Result,
    database::{ports::BookRepository, postgres::internal},
    query::{BookFilters, BookQuery, BookSort},
};

#[derive(Clone, Debug)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

const BOOK_COLUMNS: &str = "id, title, subtitle, isbn_10, isbn_13, \
     description, table_of_contents, language, pages, weight, dimensions, \
     price, cost_price, discount_percentage, stock_quantity, \
     min_stock_level, publication_date, edition, format, status, \
     average_rating, total_reviews, cover_image_url, sample_url, featured, \
     bestseller, new_arrival, tags, publisher_id, category_id, created_at, \
     updated_at";

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    subtitle: Option<String>,
    isbn_10: Option<String>,
    isbn_13: Option<String>,
    description: String,
    table_of_contents: Option<String>,
    language: String,
    pages: Option<i32>,
    weight: Option<Decimal>,
    dimensions: Option<String>,
    price: Decimal,
    cost_price: Option<Decimal>,
    discount_percentage: Decimal,
    stock_quantity: i32,
    min_stock_level: i32,
    publication_date: Option<NaiveDate>,
    edition: Option<String>,
    format: String,
    status: String,
    average_rating: Decimal,
    total_reviews: i32,
    cover_image_url: Option<String>,
    sample_url: Option<String>,
    featured: bool,
    bestseller: bool,
    new_arrival: bool,
    tags: Option<String>,
    publisher_id: Option<Uuid>,
    category_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookRow {
    fn into_book(self, author_ids: Vec<AuthorID>) -> Result<Book> {
        let format = self.format.parse().map_err(|e| {
            CatalogError::Internal(format!("corrupt book row {}: {e}", self.id))
        })?;
        let status = self.status.parse().map_err(|e| {
            CatalogError::Internal(format!("corrupt book row {}: {e}", self.id))
        })?;
        Ok(Book {
            id: BookID(self.id),
            title: self.title,
            subtitle: self.subtitle,
            isbn_10: self.isbn_10,
            isbn_13: self.isbn_13,
            description: self.description,
            table_of_contents: self.table_of_contents,
            language: self.language,
            pages: self.pages.map(|pages| pages.max(0) as u32),
            weight: self.weight,
            dimensions: self.dimensions,
            price: self.price,
            cost_price: self.cost_price,
            discount_percentage: self.discount_percentage,
            stock_quantity: self.stock_quantity.max(0) as u32,
            min_stock_level: self.min_stock_level.max(0) as u32,
            publication_date: self.publication_date,
            edition: self.edition,
            format,
            status,
            average_rating: self.average_rating,
            total_reviews: self.total_reviews.max(0) as u32,
            cover_image_url: self.cover_image_url,
            sample_url: self.sample_url,
            featured: self.featured,
            bestseller: self.bestseller,
            new_arrival: self.new_arrival,
            tags: self.tags,
            author_ids,
            publisher_id: self.publisher_id.map(PublisherID),
            category_id: self.category_id.map(CategoryID),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRefRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    bio: Option<String>,
    birth_date: Option<NaiveDate>,
    website: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AuthorRefRow> for Author {
    fn from(row: AuthorRefRow) -> Self {
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

#[derive(sqlx::FromRow)]
struct CategoryRefRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRefRow> for Category {
    fn from(row: CategoryRefRow) -> Self {
        Category {
            id: CategoryID(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Escape LIKE wildcards in user-supplied search text.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Append the WHERE clause for a filter set.
///
/// Must agree with `BookFilters::matches`, the reference semantics.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &BookFilters) {
    builder.push(" WHERE TRUE");
    if filters.available_only {
        builder.push(" AND status = 'available' AND stock_quantity > 0");
    }
    if let Some(featured) = filters.featured {
        builder.push(" AND featured = ").push_bind(featured);
    }
    if let Some(bestseller) = filters.bestseller {
        builder.push(" AND bestseller = ").push_bind(bestseller);
    }
    if let Some(new_arrival) = filters.new_arrival {
        builder.push(" AND new_arrival = ").push_bind(new_arrival);
    }
    if let Some(status) = filters.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(format) = filters.format {
        builder.push(" AND format = ").push_bind(format.as_str());
    }
    if let Some(category) = filters.category {
        builder
            .push(" AND category_id = ")
            .push_bind(category.to_uuid());
    }
    if let Some(needle) = &filters.title_contains {
        builder
            .push(" AND title ILIKE ")
            .push_bind(format!("%{}%", escape_like(needle)));
    }
    if let Some(band) = filters.stock_band {
        match band {
            StockBand::Out => {
                builder.push(" AND stock_quantity = 0");
            }
            StockBand::Low => {
                builder
                    .push(" AND stock_quantity > 0 AND stock_quantity <= ")
                    .push_bind(LOW_STOCK_CEILING as i32);
            }
            StockBand::Good => {
                builder
                    .push(" AND stock_quantity > ")
                    .push_bind(LOW_STOCK_CEILING as i32);
            }
        }
    }
    if let Some(band) = filters.price_band {
        let (lower, upper) = band.bounds();
        if let Some(lower) = lower {
            builder.push(" AND price >= ").push_bind(lower);
        }
        if let Some(upper) = upper {
            builder.push(" AND price < ").push_bind(upper);
        }
    }
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn isbn_taken(
        &self,
        column: &'static str,
        isbn: &str,
        exclude: Option<BookID>,
    ) -> Result<bool> {
        let (taken,): (bool,) = sqlx::query_as(&format!(
            "SELECT EXISTS (
                SELECT 1 FROM books WHERE {column} = $1 AND id IS DISTINCT FROM $2
            )"
        ))
        .bind(isbn)
        .bind(exclude.map(|id| id.to_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to check ISBN", e))?;
        Ok(taken)
    }

    async fn check_unique_isbns(
        &self,
        draft: &BookDraft,
        exclude: Option<BookID>,
    ) -> Result<()> {
        if let Some(isbn) = &draft.isbn_10
            && self.isbn_taken("isbn_10", isbn, exclude).await?
        {
            return Err(ValidationError::Unique {
                field: "isbn_10",
                value: isbn.clone(),
            }
            .into());
        }
        if let Some(isbn) = &draft.isbn_13
            && self.isbn_taken("isbn_13", isbn, exclude).await?
        {
            return Err(ValidationError::Unique {
                field: "isbn_13",
                value: isbn.clone(),
            }
            .into());
        }
        Ok(())
    }

    async fn check_references(&self, draft: &BookDraft) -> Result<()> {
        for author_id in &draft.author_ids {
            let (exists,): (bool,) = sqlx::query_as(
                "SELECT EXISTS (SELECT 1 FROM authors WHERE id = $1)",
            )
            .bind(author_id.to_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| internal("failed to check author", e))?;
            if !exists {
                return Err(CatalogError::NotFound(format!(
                    "author {author_id}"
                )));
            }
        }
        if let Some(category_id) = draft.category_id {
            let (exists,): (bool,) = sqlx::query_as(
                "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)",
            )
            .bind(category_id.to_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| internal("failed to check category", e))?;
            if !exists {
                return Err(CatalogError::NotFound(format!(
                    "category {category_id}"
                )));
            }
        }
        if let Some(publisher_id) = draft.publisher_id {
            let (exists,): (bool,) = sqlx::query_as(
                "SELECT EXISTS (SELECT 1 FROM publishers WHERE id = $1)",
            )
            .bind(publisher_id.to_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| internal("failed to check publisher", e))?;
            if !exists {
                return Err(CatalogError::NotFound(format!(
                    "publisher {publisher_id}"
                )));
            }
        }
        Ok(())
    }

    /// Author links for a batch of books, grouped in association order.
    async fn author_links(
        &self,
        book_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<AuthorID>>> {
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT book_id, author_id FROM book_authors
             WHERE book_id = ANY($1)
             ORDER BY book_id, position",
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal("failed to load author links", e))?;

        let mut links: HashMap<Uuid, Vec<AuthorID>> = HashMap::new();
        for (book_id, author_id) in rows {
            links.entry(book_id).or_default().push(AuthorID(author_id));
        }
        Ok(links)
    }

    /// Turn raw rows into books with their author id lists attached.
    async fn hydrate(&self, rows: Vec<BookRow>) -> Result<Vec<Book>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut links = self.author_links(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let authors = links.remove(&row.id).unwrap_or_default();
                row.into_book(authors)
            })
            .collect()
    }

    /// Resolve categories and authors for a batch of books in two
    /// queries, so consumers never go back per row.
    async fn attach_details(&self, books: Vec<Book>) -> Result<Vec<BookDetails>> {
        let author_ids: Vec<Uuid> = books
            .iter()
            .flat_map(|book| book.author_ids.iter().map(|id| id.to_uuid()))
            .collect();
        let category_ids: Vec<Uuid> = books
            .iter()
            .filter_map(|book| book.category_id.map(|id| id.to_uuid()))
            .collect();

        let authors: Vec<Author> = if author_ids.is_empty() {
            Vec::new()
        } else {
            let rows: Vec<AuthorRefRow> = sqlx::query_as(
                "SELECT id, first_name, last_name, bio, birth_date, website, created_at
                 FROM authors WHERE id = ANY($1)",
            )
            .bind(&author_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal("failed to load authors", e))?;
            rows.into_iter().map(Into::into).collect()
        };
        let authors_by_id: HashMap<AuthorID, Author> =
            authors.into_iter().map(|author| (author.id, author)).collect();

        let categories: Vec<Category> = if category_ids.is_empty() {
            Vec::new()
        } else {
            let rows: Vec<CategoryRefRow> = sqlx::query_as(
                "SELECT id, name, description, created_at
                 FROM categories WHERE id = ANY($1)",
            )
            .bind(&category_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal("failed to load categories", e))?;
            rows.into_iter().map(Into::into).collect()
        };
        let categories_by_id: HashMap<CategoryID, Category> = categories
            .into_iter()
            .map(|category| (category.id, category))
            .collect();

        Ok(books
            .into_iter()
            .map(|book| {
                let authors = book
                    .author_ids
                    .iter()
                    .filter_map(|id| authors_by_id.get(id).cloned())
                    .collect();
                let category = book
                    .category_id
                    .and_then(|id| categories_by_id.get(&id).cloned());
                BookDetails {
                    book,
                    authors,
                    category,
                }
            })
            .collect())
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn create(&self, draft: BookDraft) -> Result<Book> {
        let draft = draft.normalized();
        draft.validate()?;
        self.check_unique_isbns(&draft, None).await?;
        self.check_references(&draft).await?;

        let id = Uuid::now_v7();
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal("failed to open transaction", e))?;

        sqlx::query(
            "INSERT INTO books
                (id, title, subtitle, isbn_10, isbn_13, description,
                 table_of_contents, language, pages, weight, dimensions,
                 price, cost_price, discount_percentage, stock_quantity,
                 min_stock_level, publication_date, edition, format, status,
                 average_rating, total_reviews, cover_image_url, sample_url,
                 featured, bestseller, new_arrival, tags, publisher_id,
                 category_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     $14, $15, $16, $17, $18, $19, $20, 0, 0, $21, $22, $23,
                     $24, $25, $26, $27, $28, $29, $29)",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.subtitle)
        .bind(&draft.isbn_10)
        .bind(&draft.isbn_13)
        .bind(&draft.description)
        .bind(&draft.table_of_contents)
        .bind(&draft.language)
        .bind(draft.pages.map(|pages| pages as i32))
        .bind(draft.weight)
        .bind(&draft.dimensions)
        .bind(draft.price)
        .bind(draft.cost_price)
        .bind(draft.discount_percentage)
        .bind(draft.stock_quantity as i32)
        .bind(draft.min_stock_level as i32)
        .bind(draft.publication_date)
        .bind(&draft.edition)
        .bind(draft.format.as_str())
        .bind(draft.status.as_str())
        .bind(&draft.cover_image_url)
        .bind(&draft.sample_url)
        .bind(draft.featured)
        .bind(draft.bestseller)
        .bind(draft.new_arrival)
        .bind(&draft.tags)
        .bind(draft.publisher_id.map(|p| p.to_uuid()))
        .bind(draft.category_id.map(|c| c.to_uuid()))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| internal("failed to create book", e))?;

        for (position, author_id) in draft.author_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO book_authors (book_id, author_id, position)
                 VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(author_id.to_uuid())
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| internal("failed to link author", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| internal("failed to commit book", e))?;

        debug!(book_id = %id, "created book");
        self.get(BookID(id))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("book {id}")))
    }

    async fn get(&self, id: BookID) -> Result<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to get book", e))?;

        match row {
            Some(row) => {
                let links = self.author_links(&[row.id]).await?;
                let authors =
                    links.get(&row.id).cloned().unwrap_or_default();
                Ok(Some(row.into_book(authors)?))
            }
            None => Ok(None),
        }
    }

    async fn get_detailed(&self, id: BookID) -> Result<Option<BookDetails>> {
        match self.get(id).await? {
            Some(book) => {
                Ok(self.attach_details(vec![book]).await?.into_iter().next())
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: BookID, draft: BookDraft) -> Result<Book> {
        let draft = draft.normalized();
        draft.validate()?;
        self.check_unique_isbns(&draft, Some(id)).await?;
        self.check_references(&draft).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal("failed to open transaction", e))?;

        let result = sqlx::query(
            "UPDATE books SET
                title = $2, subtitle = $3, isbn_10 = $4, isbn_13 = $5,
                description = $6, table_of_contents = $7, language = $8,
                pages = $9, weight = $10, dimensions = $11, price = $12,
                cost_price = $13, discount_percentage = $14,
                stock_quantity = $15, min_stock_level = $16,
                publication_date = $17, edition = $18, format = $19,
                status = $20, cover_image_url = $21, sample_url = $22,
                featured = $23, bestseller = $24, new_arrival = $25,
                tags = $26, publisher_id = $27, category_id = $28,
                updated_at = $29
             WHERE id = $1",
        )
        .bind(id.to_uuid())
        .bind(&draft.title)
        .bind(&draft.subtitle)
        .bind(&draft.isbn_10)
        .bind(&draft.isbn_13)
        .bind(&draft.description)
        .bind(&draft.table_of_contents)
        .bind(&draft.language)
        .bind(draft.pages.map(|pages| pages as i32))
        .bind(draft.weight)
        .bind(&draft.dimensions)
        .bind(draft.price)
        .bind(draft.cost_price)
        .bind(draft.discount_percentage)
        .bind(draft.stock_quantity as i32)
        .bind(draft.min_stock_level as i32)
        .bind(draft.publication_date)
        .bind(&draft.edition)
        .bind(draft.format.as_str())
        .bind(draft.status.as_str())
        .bind(&draft.cover_image_url)
        .bind(&draft.sample_url)
        .bind(draft.featured)
        .bind(draft.bestseller)
        .bind(draft.new_arrival)
        .bind(&draft.tags)
        .bind(draft.publisher_id.map(|p| p.to_uuid()))
        .bind(draft.category_id.map(|c| c.to_uuid()))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| internal("failed to update book", e))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("book {id}")));
        }

        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(id.to_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| internal("failed to unlink authors", e))?;
        for (position, author_id) in draft.author_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO book_authors (book_id, author_id, position)
                 VALUES ($1, $2, $3)",
            )
            .bind(id.to_uuid())
            .bind(author_id.to_uuid())
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| internal("failed to link author", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| internal("failed to commit book update", e))?;

        self.get(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("book {id}")))
    }

    async fn delete(&self, id: BookID) -> Result<()> {
        // Reviews, images, and author links cascade in SQL.
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.to_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("failed to delete book", e))?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("book {id}")));
        }
        Ok(())
    }

    async fn search(&self, query: &BookQuery) -> Result<Vec<BookDetails>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            format!("SELECT {BOOK_COLUMNS} FROM books"),
        );
        push_filters(&mut builder, &query.filters);
        match query.sort {
            BookSort::TitleAsc => {
                builder.push(" ORDER BY LOWER(title) ASC, id ASC");
            }
            BookSort::CreatedDesc => {
                builder.push(" ORDER BY created_at DESC, id DESC");
            }
        }
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = builder
            .build_query_as::<BookRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal("failed to search books", e))?;

        let books = self.hydrate(rows).await?;
        self.attach_details(books).await
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| internal("failed to count books", e))?;
        Ok(count as u64)
    }

    async fn mark_featured(&self, ids: &[BookID]) -> Result<u64> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.to_uuid()).collect();
        let result = sqlx::query(
            "UPDATE books SET featured = TRUE, updated_at = $2
             WHERE id = ANY($1)",
        )
        .bind(&ids)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| internal("failed to mark featured", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_bestseller(&self, ids: &[BookID]) -> Result<u64> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.to_uuid()).collect();
        let result = sqlx::query(
            "UPDATE books SET bestseller = TRUE, updated_at = $2
             WHERE id = ANY($1)",
        )
        .bind(&ids)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| internal("failed to mark bestseller", e))?;
        Ok(result.rows_affected())
    }

    async fn apply_discount(
        &self,
        ids: &[BookID],
        percentage: Decimal,
    ) -> Result<u64> {
        if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(ValidationError::OutOfRange {
                field: "discount_percentage",
                message: format!("{percentage} is outside 0..=100"),
            }
            .into());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.to_uuid()).collect();
        let result = sqlx::query(
            "UPDATE books SET discount_percentage = $2, updated_at = $3
             WHERE id = ANY($1)",
        )
        .bind(&ids)
        .bind(percentage)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| internal("failed to apply discount", e))?;
        Ok(result.rows_affected())
    }
}
