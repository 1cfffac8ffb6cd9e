//! End-to-end checks of the public storefront endpoints against a
//! seeded in-memory catalog.

use std::sync::Arc;

use axum_test::TestServer;
use rust_decimal::Decimal;
use serde_json::Value;

use bindery_core::Catalog;
use bindery_model::{BookDraft, CategoryDraft};
use bindery_server::{
    build_router,
    infra::{
        app_state::AppState,
        config::{Config, DatabaseConfig, ServerConfig},
    },
};

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: None,
            run_migrations: false,
        },
    }
}

fn test_server(catalog: Catalog) -> TestServer {
    let state = AppState::new(catalog, Arc::new(test_config()));
    TestServer::new(build_router(state)).expect("router should start")
}

fn book(title: &str, cents: i64) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        description: format!("About {title}"),
        price: Decimal::new(cents, 2),
        stock_quantity: 8,
        ..Default::default()
    }
}

#[tokio::test]
async fn home_reports_counts_and_shelves() {
    let catalog = Catalog::memory();
    catalog
        .categories
        .create(CategoryDraft {
            name: "Fiction".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let mut featured = book("Featured Pick", 1800);
    featured.featured = true;
    catalog.books.create(featured).await.unwrap();
    catalog.books.create(book("Plain", 1200)).await.unwrap();

    let server = test_server(catalog);
    let response = server.get("/api/v1/home").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total_books"], 2);
    assert_eq!(body["total_categories"], 1);
    assert_eq!(body["featured"].as_array().unwrap().len(), 1);
    assert_eq!(body["new_arrivals"].as_array().unwrap().len(), 2);
    assert_eq!(body["bestsellers"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn books_listing_is_alphabetical_and_available_only() {
    let catalog = Catalog::memory();
    catalog.books.create(book("Zebra", 1000)).await.unwrap();
    catalog.books.create(book("Aardvark", 1000)).await.unwrap();
    let mut gone = book("Gone", 1000);
    gone.stock_quantity = 0;
    catalog.books.create(gone).await.unwrap();

    let server = test_server(catalog);
    let response = server.get("/api/v1/books").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["book"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Aardvark", "Zebra"]);
}

#[tokio::test]
async fn books_search_filters_by_title_substring() {
    let catalog = Catalog::memory();
    catalog
        .books
        .create(book("The Colour of Magic", 1500))
        .await
        .unwrap();
    catalog
        .books
        .create(book("Moving Pictures", 1500))
        .await
        .unwrap();

    let server = test_server(catalog);
    let response = server
        .get("/api/v1/books")
        .add_query_param("q", "colour")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["book"]["title"], "The Colour of Magic");
}

#[tokio::test]
async fn books_search_with_no_match_returns_empty_list() {
    let catalog = Catalog::memory();
    catalog.books.create(book("Solo", 1500)).await.unwrap();

    let server = test_server(catalog);
    let response = server
        .get("/api/v1/books")
        .add_query_param("q", "nothing-here")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn book_rows_resolve_associations_inline() {
    let catalog = Catalog::memory();
    let category = catalog
        .categories
        .create(CategoryDraft {
            name: "Fantasy".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let mut draft = book("Guards! Guards!", 2200);
    draft.category_id = Some(category.id);
    catalog.books.create(draft).await.unwrap();

    let server = test_server(catalog);
    let response = server.get("/api/v1/books").await;
    let body: Value = response.json();
    let row = &body.as_array().unwrap()[0];
    assert_eq!(row["category"]["name"], "Fantasy");
    assert!(row["authors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_routes_return_not_found() {
    let server = test_server(Catalog::memory());
    let response = server.get("/api/v1/nope").await;
    assert_eq!(response.status_code(), 404);
}
