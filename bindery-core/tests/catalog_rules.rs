//! Lifecycle rules exercised through the in-memory backend: uniqueness,
//! cascade and nullify on delete, repository-owned timestamps, and
//! review aggregates.

mod common;

use std::time::Duration;

use rust_decimal::Decimal;

use bindery_core::{AdminActions, Catalog, CatalogError};
use bindery_model::{
    AuthorDraft, CategoryDraft, ImageDraft, PublisherDraft, ValidationError,
};

use common::{book_draft, create_book, review_draft};

#[tokio::test]
async fn duplicate_category_name_is_rejected() {
    let catalog = Catalog::memory();
    let draft = CategoryDraft {
        name: "Fiction".to_string(),
        description: None,
    };
    catalog.categories.create(draft.clone()).await.unwrap();

    let err = catalog.categories.create(draft).await.unwrap_err();
    match err {
        CatalogError::Validation(ValidationError::Unique { field, .. }) => {
            assert_eq!(field, "name");
        }
        other => panic!("expected uniqueness error, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_isbn_is_rejected_on_create_and_update() {
    let catalog = Catalog::memory();
    let mut first = book_draft("First");
    first.isbn_13 = Some("9780441478125".to_string());
    catalog.books.create(first).await.unwrap();

    let mut second = book_draft("Second");
    second.isbn_13 = Some("9780441478125".to_string());
    let err = catalog.books.create(second).await.unwrap_err();
    assert_eq!(
        err.as_validation().map(ValidationError::field),
        Some("isbn_13")
    );

    // The same collision must be caught when editing an existing book.
    let third = create_book(&catalog, "Third").await;
    let mut edit = book_draft("Third");
    edit.isbn_13 = Some("9780441478125".to_string());
    let err = catalog.books.update(third.id, edit).await.unwrap_err();
    assert_eq!(
        err.as_validation().map(ValidationError::field),
        Some("isbn_13")
    );
}

#[tokio::test]
async fn blank_isbn_never_collides() {
    let catalog = Catalog::memory();
    let mut first = book_draft("First");
    first.isbn_10 = Some("  ".to_string());
    catalog.books.create(first).await.unwrap();

    let mut second = book_draft("Second");
    second.isbn_10 = Some(String::new());
    let created = catalog.books.create(second).await.unwrap();
    assert_eq!(created.isbn_10, None);
}

#[tokio::test]
async fn second_review_from_same_email_is_rejected() {
    let catalog = Catalog::memory();
    let book = create_book(&catalog, "Hogfather").await;

    catalog
        .reviews
        .create(review_draft(&book, "esme@lancre.example"))
        .await
        .unwrap();
    let err = catalog
        .reviews
        .create(review_draft(&book, "esme@lancre.example"))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation().map(ValidationError::field),
        Some("reviewer_email")
    );

    // A different reader may still review the same book.
    catalog
        .reviews
        .create(review_draft(&book, "gytha@lancre.example"))
        .await
        .unwrap();
}

#[tokio::test]
async fn review_lifecycle_maintains_book_aggregates() {
    let catalog = Catalog::memory();
    let book = create_book(&catalog, "Small Gods").await;

    let mut five_stars = review_draft(&book, "brutha@omnia.example");
    five_stars.rating = 5;
    catalog.reviews.create(five_stars).await.unwrap();

    let mut two_stars = review_draft(&book, "vorbis@omnia.example");
    two_stars.rating = 2;
    let second = catalog.reviews.create(two_stars).await.unwrap();

    let stored = catalog.books.get(book.id).await.unwrap().unwrap();
    assert_eq!(stored.total_reviews, 2);
    assert_eq!(stored.average_rating, Decimal::new(350, 2)); // 3.50

    catalog.reviews.delete(second.id).await.unwrap();
    let stored = catalog.books.get(book.id).await.unwrap().unwrap();
    assert_eq!(stored.total_reviews, 1);
    assert_eq!(stored.average_rating, Decimal::from(5));
}

#[tokio::test]
async fn deleting_a_book_cascades_to_reviews_and_images() {
    let catalog = Catalog::memory();
    let book = create_book(&catalog, "Eric").await;

    catalog
        .reviews
        .create(review_draft(&book, "rincewind@unseen.example"))
        .await
        .unwrap();
    catalog
        .images
        .add(ImageDraft {
            book_id: book.id,
            image_url: "https://img.example/eric.jpg".to_string(),
            alt_text: None,
            is_primary: true,
        })
        .await
        .unwrap();

    catalog.books.delete(book.id).await.unwrap();

    assert!(catalog.books.get(book.id).await.unwrap().is_none());
    assert!(
        catalog
            .reviews
            .list_for_book(book.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        catalog
            .images
            .list_for_book(book.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn deleting_a_category_detaches_books() {
    let catalog = Catalog::memory();
    let category = catalog
        .categories
        .create(CategoryDraft {
            name: "Satire".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let mut draft = book_draft("Pyramids");
    draft.category_id = Some(category.id);
    let book = catalog.books.create(draft).await.unwrap();

    catalog.categories.delete(category.id).await.unwrap();

    let stored = catalog.books.get(book.id).await.unwrap().unwrap();
    assert_eq!(stored.category_id, None);
}

#[tokio::test]
async fn deleting_a_publisher_nullifies_books() {
    let catalog = Catalog::memory();
    let publisher = catalog
        .publishers
        .create(PublisherDraft {
            name: "Gollancz".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut draft = book_draft("Mort");
    draft.publisher_id = Some(publisher.id);
    let book = catalog.books.create(draft).await.unwrap();

    catalog.publishers.delete(publisher.id).await.unwrap();

    let stored = catalog.books.get(book.id).await.unwrap().unwrap();
    assert_eq!(stored.publisher_id, None);
}

#[tokio::test]
async fn deleting_an_author_detaches_without_deleting_books() {
    let catalog = Catalog::memory();
    let author = catalog
        .authors
        .create(AuthorDraft {
            first_name: "Terry".to_string(),
            last_name: "Pratchett".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut draft = book_draft("Guards! Guards!");
    draft.author_ids = vec![author.id];
    let book = catalog.books.create(draft).await.unwrap();

    catalog.authors.delete(author.id).await.unwrap();

    let stored = catalog.books.get(book.id).await.unwrap().unwrap();
    assert!(stored.author_ids.is_empty());
}

#[tokio::test]
async fn update_refreshes_the_update_timestamp_only() {
    let catalog = Catalog::memory();
    let book = create_book(&catalog, "Jingo").await;

    tokio::time::sleep(Duration::from_millis(5)).await;

    let mut edit = book_draft("Jingo");
    edit.stock_quantity = 3;
    let updated = catalog.books.update(book.id, edit).await.unwrap();

    assert_eq!(updated.created_at, book.created_at);
    assert!(updated.updated_at > book.updated_at);
}

#[tokio::test]
async fn update_preserves_review_aggregates() {
    let catalog = Catalog::memory();
    let book = create_book(&catalog, "Thud!").await;
    let mut review = review_draft(&book, "sybil@ankh.example");
    review.rating = 5;
    catalog.reviews.create(review).await.unwrap();

    let edit = book_draft("Thud!");
    let updated = catalog.books.update(book.id, edit).await.unwrap();

    assert_eq!(updated.total_reviews, 1);
    assert_eq!(updated.average_rating, Decimal::from(5));
}

#[tokio::test]
async fn bulk_actions_apply_uniformly() {
    let catalog = Catalog::memory();
    let first = create_book(&catalog, "Sourcery").await;
    let second = {
        let mut draft = book_draft("Maskerade");
        draft.discount_percentage = Decimal::from(40);
        catalog.books.create(draft).await.unwrap()
    };
    let untouched = create_book(&catalog, "Snuff").await;

    let admin = AdminActions::new(catalog.books.clone());
    let ids = [first.id, second.id];

    assert_eq!(admin.mark_featured(&ids).await.unwrap(), 2);
    assert_eq!(admin.mark_bestseller(&ids).await.unwrap(), 2);
    // The 10% discount overwrites whatever was there before.
    assert_eq!(admin.apply_ten_percent_discount(&ids).await.unwrap(), 2);

    for id in ids {
        let book = catalog.books.get(id).await.unwrap().unwrap();
        assert!(book.featured);
        assert!(book.bestseller);
        assert_eq!(book.discount_percentage, Decimal::TEN);
    }

    let book = catalog.books.get(untouched.id).await.unwrap().unwrap();
    assert!(!book.featured);
    assert!(!book.bestseller);
    assert_eq!(book.discount_percentage, Decimal::ZERO);
}

#[tokio::test]
async fn helpful_votes_increment() {
    let catalog = Catalog::memory();
    let book = create_book(&catalog, "Truckers").await;
    let review = catalog
        .reviews
        .create(review_draft(&book, "masklin@store.example"))
        .await
        .unwrap();

    catalog.reviews.mark_helpful(review.id).await.unwrap();
    let bumped = catalog.reviews.mark_helpful(review.id).await.unwrap();
    assert_eq!(bumped.helpful_votes, 2);
}

#[tokio::test]
async fn primary_image_promotion_demotes_siblings() {
    let catalog = Catalog::memory();
    let book = create_book(&catalog, "Dodger").await;

    let first = catalog
        .images
        .add(ImageDraft {
            book_id: book.id,
            image_url: "https://img.example/one.jpg".to_string(),
            alt_text: None,
            is_primary: true,
        })
        .await
        .unwrap();
    let second = catalog
        .images
        .add(ImageDraft {
            book_id: book.id,
            image_url: "https://img.example/two.jpg".to_string(),
            alt_text: Some("back cover".to_string()),
            is_primary: false,
        })
        .await
        .unwrap();

    catalog.images.set_primary(second.id).await.unwrap();

    let images = catalog.images.list_for_book(book.id).await.unwrap();
    let primaries: Vec<_> =
        images.iter().filter(|image| image.is_primary).collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0].id, second.id);
    // Primary sorts first even though it was uploaded later.
    assert_eq!(images[0].id, second.id);
    assert_eq!(images[1].id, first.id);
}

#[tokio::test]
async fn missing_ids_surface_not_found() {
    let catalog = Catalog::memory();
    let phantom = create_book(&catalog, "Phantom").await;
    catalog.books.delete(phantom.id).await.unwrap();

    let err = catalog.books.delete(phantom.id).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let err = catalog
        .books
        .update(phantom.id, book_draft("Phantom"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}
