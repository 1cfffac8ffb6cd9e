use thiserror::Error;

/// Validation failures raised by entity constructors and update payloads.
///
/// Every variant names the offending field so callers can surface the
/// rejection next to the right input. These are deterministic input
/// errors; retrying the same payload will fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} is out of range: {message}")]
    OutOfRange {
        field: &'static str,
        message: String,
    },

    #[error("{field} exceeds maximum length of {max}")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be unique: `{value}` already exists")]
    Unique { field: &'static str, value: String },
}

impl ValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required(field) => field,
            ValidationError::OutOfRange { field, .. } => field,
            ValidationError::TooLong { field, .. } => field,
            ValidationError::Unique { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Reject a missing or blank required string.
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Enforce a maximum character count on a string field.
pub(crate) fn max_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
