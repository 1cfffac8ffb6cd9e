use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use bindery_model::{
    Book, BookDetails, BookDraft, BookID, ValidationError,
};

use crate::{
    CatalogError, Result,
    database::{
        memory::{Shared, Tables, read, write},
        ports::BookRepository,
    },
    query::{BookQuery, BookSort},
};

#[derive(Clone, Debug)]
pub struct MemoryBookRepository {
    shared: Shared,
}

impl MemoryBookRepository {
    pub(crate) fn new(shared: Shared) -> Self {
        Self { shared }
    }
}

fn check_unique_isbns(
    tables: &Tables,
    draft: &BookDraft,
    exclude: Option<BookID>,
) -> Result<()> {
    for book in tables.books.values() {
        if Some(book.id) == exclude {
            continue;
        }
        if let Some(isbn) = &draft.isbn_10
            && book.isbn_10.as_deref() == Some(isbn)
        {
            return Err(ValidationError::Unique {
                field: "isbn_10",
                value: isbn.clone(),
            }
            .into());
        }
        if let Some(isbn) = &draft.isbn_13
            && book.isbn_13.as_deref() == Some(isbn)
        {
            return Err(ValidationError::Unique {
                field: "isbn_13",
                value: isbn.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn check_references(tables: &Tables, draft: &BookDraft) -> Result<()> {
    for author_id in &draft.author_ids {
        if !tables.authors.contains_key(author_id) {
            return Err(CatalogError::NotFound(format!("author {author_id}")));
        }
    }
    if let Some(category_id) = draft.category_id
        && !tables.categories.contains_key(&category_id)
    {
        return Err(CatalogError::NotFound(format!("category {category_id}")));
    }
    if let Some(publisher_id) = draft.publisher_id
        && !tables.publishers.contains_key(&publisher_id)
    {
        return Err(CatalogError::NotFound(format!(
            "publisher {publisher_id}"
        )));
    }
    Ok(())
}

fn attach_details(tables: &Tables, book: Book) -> BookDetails {
    let authors = book
        .author_ids
        .iter()
        .filter_map(|id| tables.authors.get(id).cloned())
        .collect();
    let category = book
        .category_id
        .and_then(|id| tables.categories.get(&id).cloned());
    BookDetails {
        book,
        authors,
        category,
    }
}

fn sort_books(books: &mut [Book], sort: BookSort) {
    match sort {
        BookSort::TitleAsc => books.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.0.cmp(&b.id.0))
        }),
        // UUID v7 ids are time-ordered, which stabilizes same-instant rows.
        BookSort::CreatedDesc => books.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        }),
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn create(&self, draft: BookDraft) -> Result<Book> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut tables = write(&self.shared);
        check_unique_isbns(&tables, &draft, None)?;
        check_references(&tables, &draft)?;

        let now = Utc::now();
        let book = Book {
            id: BookID::new(),
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
        };
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn get(&self, id: BookID) -> Result<Option<Book>> {
        Ok(read(&self.shared).books.get(&id).cloned())
    }

    async fn get_detailed(&self, id: BookID) -> Result<Option<BookDetails>> {
        let tables = read(&self.shared);
        Ok(tables
            .books
            .get(&id)
            .cloned()
            .map(|book| attach_details(&tables, book)))
    }

    async fn update(&self, id: BookID, draft: BookDraft) -> Result<Book> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut tables = write(&self.shared);
        if !tables.books.contains_key(&id) {
            return Err(CatalogError::NotFound(format!("book {id}")));
        }
        check_unique_isbns(&tables, &draft, Some(id))?;
        check_references(&tables, &draft)?;

        let book = tables
            .books
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("book {id}")))?;
        book.title = draft.title;
        book.subtitle = draft.subtitle;
        book.isbn_10 = draft.isbn_10;
        book.isbn_13 = draft.isbn_13;
        book.description = draft.description;
        book.table_of_contents = draft.table_of_contents;
        book.language = draft.language;
        book.pages = draft.pages;
        book.weight = draft.weight;
        book.dimensions = draft.dimensions;
        book.price = draft.price;
        book.cost_price = draft.cost_price;
        book.discount_percentage = draft.discount_percentage;
        book.stock_quantity = draft.stock_quantity;
        book.min_stock_level = draft.min_stock_level;
        book.publication_date = draft.publication_date;
        book.edition = draft.edition;
        book.format = draft.format;
        book.status = draft.status;
        book.cover_image_url = draft.cover_image_url;
        book.sample_url = draft.sample_url;
        book.featured = draft.featured;
        book.bestseller = draft.bestseller;
        book.new_arrival = draft.new_arrival;
        book.tags = draft.tags;
        book.author_ids = draft.author_ids;
        book.publisher_id = draft.publisher_id;
        book.category_id = draft.category_id;
        book.updated_at = Utc::now();
        Ok(book.clone())
    }

    async fn delete(&self, id: BookID) -> Result<()> {
        let mut tables = write(&self.shared);
        if tables.books.remove(&id).is_none() {
            return Err(CatalogError::NotFound(format!("book {id}")));
        }
        // Owned dependents go with the aggregate root.
        tables.reviews.retain(|_, review| review.book_id != id);
        tables.images.retain(|_, image| image.book_id != id);
        Ok(())
    }

    async fn search(&self, query: &BookQuery) -> Result<Vec<BookDetails>> {
        let tables = read(&self.shared);
        let mut books: Vec<Book> = tables
            .books
            .values()
            .filter(|book| query.filters.matches(book))
            .cloned()
            .collect();
        sort_books(&mut books, query.sort);
        if let Some(limit) = query.limit {
            books.truncate(limit);
        }
        Ok(books
            .into_iter()
            .map(|book| attach_details(&tables, book))
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(read(&self.shared).books.len() as u64)
    }

    async fn mark_featured(&self, ids: &[BookID]) -> Result<u64> {
        let mut tables = write(&self.shared);
        let now = Utc::now();
        let mut updated = 0;
        for id in ids {
            if let Some(book) = tables.books.get_mut(id) {
                book.featured = true;
                book.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn mark_bestseller(&self, ids: &[BookID]) -> Result<u64> {
        let mut tables = write(&self.shared);
        let now = Utc::now();
        let mut updated = 0;
        for id in ids {
            if let Some(book) = tables.books.get_mut(id) {
                book.bestseller = true;
                book.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
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
        let mut tables = write(&self.shared);
        let now = Utc::now();
        let mut updated = 0;
        for id in ids {
            if let Some(book) = tables.books.get_mut(id) {
                book.discount_percentage = percentage;
                book.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
