//! Storefront query semantics: home shelves, listing, search, and the
//! admin filter bands, all through the in-memory backend.

mod common;

use rust_decimal::Decimal;

use bindery_core::{
    Catalog, Storefront,
    query::{BookFilters, BookQuery, BookSort, HOME_SHELF_LIMIT},
};
use bindery_model::{
    AuthorDraft, BookStatus, CategoryDraft, PriceBand, StockBand,
};

use common::{book_draft, create_book};

#[tokio::test]
async fn home_counts_and_shelves() {
    let catalog = Catalog::memory();
    let storefront = Storefront::new(catalog.clone());

    catalog
        .categories
        .create(CategoryDraft {
            name: "Fantasy".to_string(),
            description: None,
        })
        .await
        .unwrap();
    catalog
        .authors
        .create(AuthorDraft {
            first_name: "Diane".to_string(),
            last_name: "Duane".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut featured = book_draft("So You Want to Be a Wizard");
    featured.featured = true;
    catalog.books.create(featured).await.unwrap();
    create_book(&catalog, "Deep Wizardry").await;

    let home = storefront.home().await.unwrap();
    assert_eq!(home.total_books, 2);
    assert_eq!(home.total_authors, 1);
    assert_eq!(home.total_categories, 1);
    assert_eq!(home.featured.len(), 1);
    assert_eq!(home.new_arrivals.len(), 2);
    assert!(home.bestsellers.is_empty());
}

#[tokio::test]
async fn home_shelves_truncate_at_six() {
    let catalog = Catalog::memory();
    let storefront = Storefront::new(catalog.clone());

    for i in 0..7 {
        let mut draft = book_draft(&format!("Featured {i}"));
        draft.featured = true;
        catalog.books.create(draft).await.unwrap();
    }

    let home = storefront.home().await.unwrap();
    assert_eq!(home.featured.len(), HOME_SHELF_LIMIT);
    assert_eq!(home.new_arrivals.len(), HOME_SHELF_LIMIT);
}

#[tokio::test]
async fn home_shelves_exclude_unavailable_books() {
    let catalog = Catalog::memory();
    let storefront = Storefront::new(catalog.clone());

    let mut sold_out = book_draft("Sold Out");
    sold_out.featured = true;
    sold_out.stock_quantity = 0;
    catalog.books.create(sold_out).await.unwrap();

    let mut discontinued = book_draft("Discontinued");
    discontinued.featured = true;
    discontinued.status = BookStatus::Discontinued;
    catalog.books.create(discontinued).await.unwrap();

    let home = storefront.home().await.unwrap();
    assert!(home.featured.is_empty());
    assert_eq!(home.total_books, 2);
}

#[tokio::test]
async fn new_arrivals_come_newest_first() {
    let catalog = Catalog::memory();
    let storefront = Storefront::new(catalog.clone());

    create_book(&catalog, "Older").await;
    create_book(&catalog, "Newer").await;

    let home = storefront.home().await.unwrap();
    assert_eq!(home.new_arrivals[0].book.title, "Newer");
    assert_eq!(home.new_arrivals[1].book.title, "Older");
}

#[tokio::test]
async fn listing_is_available_only_and_alphabetical() {
    let catalog = Catalog::memory();
    let storefront = Storefront::new(catalog.clone());

    create_book(&catalog, "Wyrd Sisters").await;
    create_book(&catalog, "Equal Rites").await;
    let mut unavailable = book_draft("Carpe Jugulum");
    unavailable.stock_quantity = 0;
    catalog.books.create(unavailable).await.unwrap();

    let listing = storefront.listing().await.unwrap();
    let titles: Vec<&str> = listing
        .iter()
        .map(|details| details.book.title.as_str())
        .collect();
    assert_eq!(titles, ["Equal Rites", "Wyrd Sisters"]);
}

#[tokio::test]
async fn blank_search_returns_full_listing_sorted_by_title() {
    let catalog = Catalog::memory();
    let storefront = Storefront::new(catalog.clone());

    for title in ["Delta", "Alpha", "Echo", "Bravo", "Charlie"] {
        create_book(&catalog, title).await;
    }
    let mut unavailable = book_draft("Foxtrot");
    unavailable.stock_quantity = 0;
    catalog.books.create(unavailable).await.unwrap();

    let results = storefront.search(Some("")).await.unwrap();
    let titles: Vec<&str> = results
        .iter()
        .map(|details| details.book.title.as_str())
        .collect();
    assert_eq!(titles, ["Alpha", "Bravo", "Charlie", "Delta", "Echo"]);

    let absent = storefront.search(None).await.unwrap();
    assert_eq!(absent.len(), 5);
}

#[tokio::test]
async fn search_matches_title_substrings_case_insensitively() {
    let catalog = Catalog::memory();
    let storefront = Storefront::new(catalog.clone());

    create_book(&catalog, "The Colour of Magic").await;
    create_book(&catalog, "Moving Pictures").await;

    let results = storefront.search(Some("COLOUR")).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].book.title, "The Colour of Magic");

    // No match is an empty result set, never an error.
    let results = storefront.search(Some("octarine")).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_results_resolve_category_and_authors() {
    let catalog = Catalog::memory();
    let storefront = Storefront::new(catalog.clone());

    let category = catalog
        .categories
        .create(CategoryDraft {
            name: "Fantasy".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let author = catalog
        .authors
        .create(AuthorDraft {
            first_name: "Terry".to_string(),
            last_name: "Pratchett".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut draft = book_draft("Reaper Man");
    draft.category_id = Some(category.id);
    draft.author_ids = vec![author.id];
    catalog.books.create(draft).await.unwrap();

    let results = storefront.search(Some("reaper")).await.unwrap();
    let details = &results[0];
    assert_eq!(
        details.category.as_ref().map(|c| c.name.as_str()),
        Some("Fantasy")
    );
    assert_eq!(details.display_authors(), "Terry Pratchett");
}

#[tokio::test]
async fn stock_bands_select_disjoint_books() {
    let catalog = Catalog::memory();

    let mut out = book_draft("Out of Stock");
    out.stock_quantity = 0;
    catalog.books.create(out).await.unwrap();

    let mut low = book_draft("Low Stock");
    low.stock_quantity = 3;
    catalog.books.create(low).await.unwrap();

    let mut good = book_draft("Good Stock");
    good.stock_quantity = 10;
    catalog.books.create(good).await.unwrap();

    for (band, expected) in [
        (StockBand::Out, "Out of Stock"),
        (StockBand::Low, "Low Stock"),
        (StockBand::Good, "Good Stock"),
    ] {
        let query = BookQuery {
            filters: BookFilters {
                stock_band: Some(band),
                ..Default::default()
            },
            sort: BookSort::TitleAsc,
            limit: None,
        };
        let results = catalog.books.search(&query).await.unwrap();
        assert_eq!(results.len(), 1, "band {band:?}");
        assert_eq!(results[0].book.title, expected);
    }
}

#[tokio::test]
async fn price_bands_honor_boundary_prices() {
    let catalog = Catalog::memory();

    for (title, cents) in [
        ("Cheap", 1999_i64),
        ("Boundary Twenty", 2000),
        ("Mid", 4999),
        ("Boundary Fifty", 5000),
        ("Boundary Hundred", 10000),
    ] {
        let mut draft = book_draft(title);
        draft.price = Decimal::new(cents, 2);
        catalog.books.create(draft).await.unwrap();
    }

    let fetch = async |band: PriceBand| {
        let query = BookQuery {
            filters: BookFilters {
                price_band: Some(band),
                ..Default::default()
            },
            sort: BookSort::TitleAsc,
            limit: None,
        };
        catalog.books.search(&query).await.unwrap()
    };

    let under = fetch(PriceBand::Under20).await;
    let titles: Vec<&str> =
        under.iter().map(|d| d.book.title.as_str()).collect();
    assert_eq!(titles, ["Cheap"]);

    let twenties = fetch(PriceBand::From20To50).await;
    let titles: Vec<&str> =
        twenties.iter().map(|d| d.book.title.as_str()).collect();
    assert_eq!(titles, ["Boundary Twenty", "Mid"]);

    let fifties = fetch(PriceBand::From50To100).await;
    let titles: Vec<&str> =
        fifties.iter().map(|d| d.book.title.as_str()).collect();
    assert_eq!(titles, ["Boundary Fifty"]);

    let over = fetch(PriceBand::Over100).await;
    let titles: Vec<&str> =
        over.iter().map(|d| d.book.title.as_str()).collect();
    assert_eq!(titles, ["Boundary Hundred"]);
}

#[tokio::test]
async fn band_filters_compose_with_availability() {
    let catalog = Catalog::memory();

    let mut cheap_unavailable = book_draft("Cheap But Gone");
    cheap_unavailable.price = Decimal::new(500, 2);
    cheap_unavailable.status = BookStatus::Discontinued;
    catalog.books.create(cheap_unavailable).await.unwrap();

    let mut cheap_available = book_draft("Cheap And Here");
    cheap_available.price = Decimal::new(500, 2);
    catalog.books.create(cheap_available).await.unwrap();

    let query = BookQuery {
        filters: BookFilters {
            available_only: true,
            price_band: Some(PriceBand::Under20),
            ..Default::default()
        },
        sort: BookSort::TitleAsc,
        limit: None,
    };
    let results = catalog.books.search(&query).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].book.title, "Cheap And Here");
}
