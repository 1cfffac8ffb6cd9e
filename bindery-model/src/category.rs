use chrono::{DateTime, Utc};

use crate::{
    error::{self, Result},
    ids::CategoryID,
    none_if_blank,
};

pub const CATEGORY_NAME_MAX: usize = 100;

/// A browsing category such as Fiction, Science, or History.
///
/// Categories are independently owned reference data: deleting one
/// detaches referencing books rather than deleting them.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Category {
    pub id: CategoryID,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryDraft {
    /// Collapse blank optional fields to `None`.
    pub fn normalized(mut self) -> Self {
        self.description = none_if_blank(self.description);
        self
    }

    pub fn validate(&self) -> Result<()> {
        error::require("name", &self.name)?;
        error::max_len("name", &self.name, CATEGORY_NAME_MAX)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn blank_name_is_rejected() {
        let draft = CategoryDraft {
            name: "   ".to_string(),
            description: None,
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Required("name"))
        );
    }

    #[test]
    fn blank_description_normalizes_to_none() {
        let draft = CategoryDraft {
            name: "Fiction".to_string(),
            description: Some("  ".to_string()),
        }
        .normalized();
        assert_eq!(draft.description, None);
    }
}
