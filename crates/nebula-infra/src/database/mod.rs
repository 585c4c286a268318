//! PostgreSQL storage via SeaORM.

mod connections;

#[cfg(feature = "postgres")]
mod directory;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod post_store;

pub use connections::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use directory::{PostgresAuthorDirectory, PostgresEngagement};
#[cfg(feature = "postgres")]
pub use post_store::{BULK_CHUNK_SIZE, PostgresPostStore};

/// Map a SeaORM error onto the repository taxonomy.
#[cfg(feature = "postgres")]
fn query_err(e: sea_orm::DbErr) -> nebula_core::RepoError {
    use nebula_core::RepoError;
    use sea_orm::DbErr;

    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}
