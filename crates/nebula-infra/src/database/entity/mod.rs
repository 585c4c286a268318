//! SeaORM entities.

pub mod blog_post;
pub mod comment;
pub mod like;
pub mod user;
