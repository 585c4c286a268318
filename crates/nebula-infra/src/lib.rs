//! # Nebula Infrastructure
//!
//! Concrete implementations of the ports defined in `nebula-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL stores via SeaORM
//! - `minimal` - No external dependencies, in-memory only

pub mod database;
pub mod memory;

// Re-exports - In-Memory
pub use memory::{InMemoryAuthorDirectory, InMemoryEngagement, InMemoryPostStore};

// Re-exports - PostgreSQL
pub use database::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use database::{PostgresAuthorDirectory, PostgresEngagement, PostgresPostStore};
