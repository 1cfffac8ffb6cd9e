//! Bulk actions consumed by the administrative screen.
//!
//! Each action applies uniformly to an arbitrary selected subset of
//! books and performs no validation beyond the field-level invariants
//! the repositories already enforce.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use bindery_model::BookID;

use crate::{Result, database::ports::BookRepository};

/// Discount applied by [`AdminActions::apply_ten_percent_discount`].
pub fn bulk_discount_percentage() -> Decimal {
    Decimal::TEN
}

/// Thin application service exposing the admin bulk actions.
#[derive(Clone)]
pub struct AdminActions {
    books: Arc<dyn BookRepository>,
}

impl std::fmt::Debug for AdminActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminActions").finish_non_exhaustive()
    }
}

impl AdminActions {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// Set `featured = true` on each selected book.
    pub async fn mark_featured(&self, ids: &[BookID]) -> Result<u64> {
        let updated = self.books.mark_featured(ids).await?;
        info!(selected = ids.len(), updated, "marked books as featured");
        Ok(updated)
    }

    /// Set `bestseller = true` on each selected book.
    pub async fn mark_bestseller(&self, ids: &[BookID]) -> Result<u64> {
        let updated = self.books.mark_bestseller(ids).await?;
        info!(selected = ids.len(), updated, "marked books as bestsellers");
        Ok(updated)
    }

    /// Set `discount_percentage = 10` on each selected book,
    /// overwriting any prior value.
    pub async fn apply_ten_percent_discount(
        &self,
        ids: &[BookID],
    ) -> Result<u64> {
        let updated = self
            .books
            .apply_discount(ids, bulk_discount_percentage())
            .await?;
        info!(selected = ids.len(), updated, "applied 10% discount");
        Ok(updated)
    }
}
