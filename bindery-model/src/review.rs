use chrono::{DateTime, Utc};

use crate::{
    error::{self, Result, ValidationError},
    ids::{BookID, ReviewID},
};

pub const REVIEW_TITLE_MAX: usize = 200;
pub const REVIEWER_NAME_MAX: usize = 100;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// A customer review, owned by its book.
///
/// At most one review exists per (book, reviewer email) pair; the
/// repository enforces that on create.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BookReview {
    pub id: ReviewID,
    pub book_id: BookID,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub rating: u8,
    pub title: String,
    pub body: String,
    pub verified_purchase: bool,
    pub helpful_votes: u32,
    pub created_at: DateTime<Utc>,
}

/// Payload for submitting a review.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReviewDraft {
    pub book_id: BookID,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub rating: u8,
    pub title: String,
    pub body: String,
    pub verified_purchase: bool,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<()> {
        error::require("reviewer_name", &self.reviewer_name)?;
        error::max_len("reviewer_name", &self.reviewer_name, REVIEWER_NAME_MAX)?;
        error::require("reviewer_email", &self.reviewer_email)?;
        if !self.reviewer_email.contains('@') {
            return Err(ValidationError::OutOfRange {
                field: "reviewer_email",
                message: format!("`{}` is not an email address", self.reviewer_email),
            });
        }
        error::require("title", &self.title)?;
        error::max_len("title", &self.title, REVIEW_TITLE_MAX)?;
        error::require("body", &self.body)?;
        if self.rating < RATING_MIN || self.rating > RATING_MAX {
            return Err(ValidationError::OutOfRange {
                field: "rating",
                message: format!("{} is outside 1..=5", self.rating),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(rating: u8) -> ReviewDraft {
        ReviewDraft {
            book_id: BookID::new(),
            reviewer_name: "Sam Vimes".to_string(),
            reviewer_email: "vimes@watch.am".to_string(),
            rating,
            title: "Boots theory".to_string(),
            body: "Good boots last for years.".to_string(),
            verified_purchase: true,
        }
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(draft(1).validate().is_ok());
        assert!(draft(5).validate().is_ok());
        assert_eq!(draft(0).validate().unwrap_err().field(), "rating");
        assert_eq!(draft(6).validate().unwrap_err().field(), "rating");
    }

    #[test]
    fn email_must_contain_at_sign() {
        let mut d = draft(4);
        d.reviewer_email = "not-an-email".to_string();
        assert_eq!(d.validate().unwrap_err().field(), "reviewer_email");
    }
}
