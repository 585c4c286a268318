//! In-memory stores - used when no database is configured, and by tests.
//!
//! Data is lost on process restart.

mod directory;
mod post_store;

pub use directory::{InMemoryAuthorDirectory, InMemoryEngagement};
pub use post_store::InMemoryPostStore;

#[cfg(test)]
mod tests;
