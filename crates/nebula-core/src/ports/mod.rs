//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod directory;
mod repository;

pub use directory::{AuthorDirectory, EngagementCounters, EngagementTotals};
pub use repository::{CategoryCount, PostStore};
