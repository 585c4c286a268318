//! Application services built on the ports.

mod blog;
mod stats;

pub use blog::{BlogService, DEFAULT_MAX_PAGE_SIZE, PostDetail, RELATED_POSTS};
pub use stats::{DashboardStats, RECENT_WINDOW_DAYS};
