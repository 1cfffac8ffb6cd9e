use bindery_model::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CatalogError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
