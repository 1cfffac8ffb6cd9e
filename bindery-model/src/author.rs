use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    error::{self, Result},
    ids::AuthorID,
    none_if_blank,
};

pub const AUTHOR_NAME_MAX: usize = 100;

/// An author of one or more books.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Author {
    pub id: AuthorID,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Author {
    /// Display name: "first last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating or replacing an author.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AuthorDraft {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub website: Option<String>,
}

impl AuthorDraft {
    pub fn normalized(mut self) -> Self {
        self.bio = none_if_blank(self.bio);
        self.website = none_if_blank(self.website);
        self
    }

    pub fn validate(&self) -> Result<()> {
        error::require("first_name", &self.first_name)?;
        error::max_len("first_name", &self.first_name, AUTHOR_NAME_MAX)?;
        error::require("last_name", &self.last_name)?;
        error::max_len("last_name", &self.last_name, AUTHOR_NAME_MAX)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, last: &str) -> Author {
        Author {
            id: AuthorID::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            bio: None,
            birth_date: None,
            website: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_name_joins_first_and_last() {
        assert_eq!(author("Ursula", "Le Guin").full_name(), "Ursula Le Guin");
    }

    #[test]
    fn missing_last_name_is_rejected() {
        let draft = AuthorDraft {
            first_name: "Ursula".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }
}
