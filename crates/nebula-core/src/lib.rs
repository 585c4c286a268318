//! # Nebula Core
//!
//! The domain layer of the Nebula content platform.
//! This crate contains the blog-post query and mutation rules with zero
//! infrastructure dependencies; storage is reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use service::BlogService;
