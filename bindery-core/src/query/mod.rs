//! Query assembly for listing, filtering, and searching books.

pub mod storefront;
pub mod types;

pub use storefront::{HOME_SHELF_LIMIT, HomePage, Storefront};
pub use types::{BookFilters, BookQuery, BookSort};
