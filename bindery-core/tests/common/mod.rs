// Not every test binary uses every helper.
#![allow(dead_code)]

use rust_decimal::Decimal;

use bindery_core::Catalog;
use bindery_model::{Book, BookDraft, ReviewDraft};

/// A purchasable draft with sensible defaults for tests.
pub fn book_draft(title: &str) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        description: format!("About {title}"),
        price: Decimal::new(2500, 2),
        stock_quantity: 10,
        ..Default::default()
    }
}

pub fn review_draft(book: &Book, email: &str) -> ReviewDraft {
    ReviewDraft {
        book_id: book.id,
        reviewer_name: "Esme Weatherwax".to_string(),
        reviewer_email: email.to_string(),
        rating: 4,
        title: "I aten't dead".to_string(),
        body: "Headology works on books too.".to_string(),
        verified_purchase: false,
    }
}

pub async fn create_book(catalog: &Catalog, title: &str) -> Book {
    catalog
        .books
        .create(book_draft(title))
        .await
        .expect("book create should succeed")
}
