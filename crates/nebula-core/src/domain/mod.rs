//! Domain entities - the core business objects and the rules that govern them.

mod author;
mod bulk;
mod post;
pub mod query;
mod view;

pub use author::Author;
pub use bulk::{BulkAction, BulkOutcome, FlagUpdate};
pub use post::{
    BlogPost, NewPost, PostChanges, PostKey, decode_tags, encode_tags, next_update_time, slugify,
};
pub use query::{
    Audience, OrderField, Page, Pagination, PostFilter, PostOrder, PostQuery, PostStatus,
    SearchTerm, SortBy, ValidQuery, paginate, run_query,
};
pub use view::{PostStats, PostView};
