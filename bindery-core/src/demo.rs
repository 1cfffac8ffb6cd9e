//! Synthetic catalog fixtures for demo mode.

use rust_decimal::Decimal;
use tracing::info;

use bindery_model::{
    AuthorDraft, BookDraft, BookFormat, CategoryDraft, PublisherDraft,
    ReviewDraft,
};

use crate::{Catalog, Result};

/// Seed a small browsable catalog so a fresh demo server has something
/// on its shelves.
pub async fn seed_demo_catalog(catalog: &Catalog) -> Result<()> {
    let fiction = catalog
        .categories
        .create(CategoryDraft {
            name: "Fiction".to_string(),
            description: Some("Novels and short stories".to_string()),
        })
        .await?;
    let science = catalog
        .categories
        .create(CategoryDraft {
            name: "Science".to_string(),
            description: None,
        })
        .await?;

    let le_guin = catalog
        .authors
        .create(AuthorDraft {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            ..Default::default()
        })
        .await?;
    let sagan = catalog
        .authors
        .create(AuthorDraft {
            first_name: "Carl".to_string(),
            last_name: "Sagan".to_string(),
            ..Default::default()
        })
        .await?;

    let harper = catalog
        .publishers
        .create(PublisherDraft {
            name: "Harper Voyager".to_string(),
            established_year: Some(1817),
            ..Default::default()
        })
        .await?;

    let dispossessed = catalog
        .books
        .create(BookDraft {
            title: "The Dispossessed".to_string(),
            description: "An ambiguous utopia.".to_string(),
            isbn_13: Some("9780060512750".to_string()),
            price: Decimal::new(1899, 2),
            stock_quantity: 12,
            featured: true,
            author_ids: vec![le_guin.id],
            publisher_id: Some(harper.id),
            category_id: Some(fiction.id),
            ..Default::default()
        })
        .await?;

    catalog
        .books
        .create(BookDraft {
            title: "The Left Hand of Darkness".to_string(),
            description: "A genly envoy on a winter world.".to_string(),
            isbn_13: Some("9780441478125".to_string()),
            price: Decimal::new(2150, 2),
            stock_quantity: 4,
            bestseller: true,
            author_ids: vec![le_guin.id],
            category_id: Some(fiction.id),
            ..Default::default()
        })
        .await?;

    catalog
        .books
        .create(BookDraft {
            title: "Cosmos".to_string(),
            description: "A personal voyage through the universe.".to_string(),
            isbn_13: Some("9780345539434".to_string()),
            price: Decimal::new(5500, 2),
            stock_quantity: 20,
            format: BookFormat::Hardcover,
            featured: true,
            bestseller: true,
            author_ids: vec![sagan.id],
            category_id: Some(science.id),
            ..Default::default()
        })
        .await?;

    catalog
        .reviews
        .create(ReviewDraft {
            book_id: dispossessed.id,
            reviewer_name: "Shevek".to_string(),
            reviewer_email: "shevek@anarres.example".to_string(),
            rating: 5,
            title: "True journey is return".to_string(),
            body: "Walls came down for me.".to_string(),
            verified_purchase: true,
        })
        .await?;

    info!("seeded demo catalog");
    Ok(())
}
