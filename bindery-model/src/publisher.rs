use chrono::{DateTime, Utc};

use crate::{
    error::{self, Result},
    ids::PublisherID,
    none_if_blank,
};

pub const PUBLISHER_NAME_MAX: usize = 200;

/// A publishing company.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Publisher {
    pub id: PublisherID,
    pub name: String,
    pub address: Option<String>,
    pub website: Option<String>,
    pub established_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a publisher.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PublisherDraft {
    pub name: String,
    pub address: Option<String>,
    pub website: Option<String>,
    pub established_year: Option<i32>,
}

impl PublisherDraft {
    pub fn normalized(mut self) -> Self {
        self.address = none_if_blank(self.address);
        self.website = none_if_blank(self.website);
        self
    }

    pub fn validate(&self) -> Result<()> {
        error::require("name", &self.name)?;
        error::max_len("name", &self.name, PUBLISHER_NAME_MAX)?;
        if let Some(year) = self.established_year
            && year < 0
        {
            return Err(crate::error::ValidationError::OutOfRange {
                field: "established_year",
                message: format!("{year} is before year zero"),
            });
        }
        Ok(())
    }
}
