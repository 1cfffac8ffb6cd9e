//! Core library for the Bindery bookstore platform.
//!
//! Holds the repository ports and their Postgres and in-memory
//! backends, the storefront query layer, and the admin bulk actions.
//! All business rules live here or in `bindery-model`; HTTP concerns
//! stay in `bindery-server`.

pub mod admin;
pub mod catalog;
pub mod database;
pub mod demo;
pub mod error;
pub mod query;

pub use admin::AdminActions;
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use query::{BookQuery, HomePage, Storefront};

/// Embedded schema migrations for the Postgres backend.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
