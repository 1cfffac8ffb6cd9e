//! Persistence layer: repository ports and their backends.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryCatalog;
pub use postgres::PostgresDatabase;
