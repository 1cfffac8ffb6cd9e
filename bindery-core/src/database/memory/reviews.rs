use async_trait::async_trait;
use chrono::Utc;

use bindery_model::{
    BookID, BookReview, ReviewDraft, ReviewID, ValidationError,
};

use crate::{
    CatalogError, Result,
    database::{
        memory::{Shared, read, refresh_book_aggregates, write},
        ports::ReviewRepository,
    },
};

#[derive(Clone, Debug)]
pub struct MemoryReviewRepository {
    shared: Shared,
}

impl MemoryReviewRepository {
    pub(crate) fn new(shared: Shared) -> Self {
        Self { shared }
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn create(&self, draft: ReviewDraft) -> Result<BookReview> {
        draft.validate()?;

        let mut tables = write(&self.shared);
        if !tables.books.contains_key(&draft.book_id) {
            return Err(CatalogError::NotFound(format!(
                "book {}",
                draft.book_id
            )));
        }
        let duplicate = tables.reviews.values().any(|review| {
            review.book_id == draft.book_id
                && review.reviewer_email == draft.reviewer_email
        });
        if duplicate {
            return Err(ValidationError::Unique {
                field: "reviewer_email",
                value: draft.reviewer_email,
            }
            .into());
        }

        let now = Utc::now();
        let review = BookReview {
            id: ReviewID::new(),
            book_id: draft.book_id,
            reviewer_name: draft.reviewer_name,
            reviewer_email: draft.reviewer_email,
            rating: draft.rating,
            title: draft.title,
            body: draft.body,
            verified_purchase: draft.verified_purchase,
            helpful_votes: 0,
            created_at: now,
        };
        tables.reviews.insert(review.id, review.clone());
        refresh_book_aggregates(&mut tables, review.book_id, now);
        Ok(review)
    }

    async fn list_for_book(&self, book_id: BookID) -> Result<Vec<BookReview>> {
        let mut reviews: Vec<BookReview> = read(&self.shared)
            .reviews
            .values()
            .filter(|review| review.book_id == book_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(reviews)
    }

    async fn delete(&self, id: ReviewID) -> Result<()> {
        let mut tables = write(&self.shared);
        let Some(review) = tables.reviews.remove(&id) else {
            return Err(CatalogError::NotFound(format!("review {id}")));
        };
        refresh_book_aggregates(&mut tables, review.book_id, Utc::now());
        Ok(())
    }

    async fn mark_helpful(&self, id: ReviewID) -> Result<BookReview> {
        let mut tables = write(&self.shared);
        let review = tables
            .reviews
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("review {id}")))?;
        review.helpful_votes += 1;
        Ok(review.clone())
    }
}
