//! Application state - shared across all handlers.

use std::sync::Arc;

use nebula_core::BlogService;
use nebula_infra::{InMemoryAuthorDirectory, InMemoryEngagement, InMemoryPostStore};

use crate::config::AppConfig;

/// Which storage backend the service is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    InMemory,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::InMemory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub storage: StorageBackend,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let state = match &config.database {
            Some(db_config) => match nebula_infra::database::connect(db_config).await {
                Ok(conn) => {
                    let blog = BlogService::new(
                        Arc::new(nebula_infra::PostgresPostStore::new(conn.clone())),
                        Arc::new(nebula_infra::PostgresAuthorDirectory::new(conn.clone())),
                        Arc::new(nebula_infra::PostgresEngagement::new(conn)),
                    )
                    .with_max_page_size(config.max_page_size);
                    Self {
                        blog,
                        storage: StorageBackend::Postgres,
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory(config.max_page_size)
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory(config.max_page_size)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            tracing::info!("Running without postgres feature - using in-memory stores");
            Self::in_memory(config.max_page_size)
        };

        tracing::info!(storage = state.storage.as_str(), "Application state initialized");
        state
    }

    /// State backed entirely by in-memory stores.
    pub fn in_memory(max_page_size: u64) -> Self {
        let blog = BlogService::new(
            Arc::new(InMemoryPostStore::new()),
            Arc::new(InMemoryAuthorDirectory::new()),
            Arc::new(InMemoryEngagement::new()),
        )
        .with_max_page_size(max_page_size);

        Self {
            blog,
            storage: StorageBackend::InMemory,
        }
    }
}
