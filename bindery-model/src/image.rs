use chrono::{DateTime, Utc};

use crate::{
    error::{self, Result},
    ids::{BookID, ImageID},
    none_if_blank,
};

pub const ALT_TEXT_MAX: usize = 200;

/// A gallery image, owned by its book.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BookImage {
    pub id: ImageID,
    pub book_id: BookID,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for attaching an image to a book.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImageDraft {
    pub book_id: BookID,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
}

impl ImageDraft {
    pub fn normalized(mut self) -> Self {
        self.alt_text = none_if_blank(self.alt_text);
        self
    }

    pub fn validate(&self) -> Result<()> {
        error::require("image_url", &self.image_url)?;
        if let Some(alt) = &self.alt_text {
            error::max_len("alt_text", alt, ALT_TEXT_MAX)?;
        }
        Ok(())
    }
}

/// Gallery ordering: primary image first, then oldest upload first.
pub fn gallery_order(images: &mut [BookImage]) {
    images.sort_by(|a, b| {
        b.is_primary
            .cmp(&a.is_primary)
            .then(a.created_at.cmp(&b.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn image(primary: bool, secs: i64) -> BookImage {
        BookImage {
            id: ImageID::new(),
            book_id: BookID::new(),
            image_url: "https://img.example/cover.jpg".to_string(),
            alt_text: None,
            is_primary: primary,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn primary_sorts_before_older_uploads() {
        let mut images =
            vec![image(false, 100), image(true, 300), image(false, 200)];
        gallery_order(&mut images);
        assert!(images[0].is_primary);
        assert_eq!(images[1].created_at.timestamp(), 100);
        assert_eq!(images[2].created_at.timestamp(), 200);
    }
}
