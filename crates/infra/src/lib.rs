//! `workforce-infra` — storage adapters.
//!
//! In-memory and PostgreSQL implementations of the directory ports, plus
//! blob stores for uploaded images.

pub mod blob;
pub mod memory;
pub mod postgres;

pub use blob::{InMemoryBlobStore, LocalBlobStore};
pub use memory::InMemoryDirectory;
pub use postgres::PostgresDirectory;
