//! # Nebula Shared
//!
//! Wire types shared by the API server and its clients.
//! Field names follow the camelCase JSON the blog front end consumes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
