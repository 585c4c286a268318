//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with key {key}")]
    NotFound { entity_type: &'static str, key: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store failure: {0}")]
    Store(#[source] RepoError),

    #[error("Bulk {action} stopped after {affected} posts: {reason}")]
    PartialFailure {
        action: &'static str,
        affected: u64,
        reason: String,
    },
}

impl DomainError {
    pub fn post_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "BlogPost",
            key: key.to_string(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Caller errors are surfaced as-is and never logged as system faults.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::InvalidArgument(_) | Self::Conflict(_)
        )
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            other => DomainError::Store(other),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A multi-row write failed after `affected` rows had already been committed.
    #[error("Partial write ({affected} rows applied): {reason}")]
    Partial { affected: u64, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violation_becomes_conflict() {
        let err: DomainError = RepoError::Constraint("slug taken".into()).into();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "slug taken"));
        assert!(err.is_caller_error());
    }

    #[test]
    fn query_failure_is_not_a_caller_error() {
        let err: DomainError = RepoError::Query("timeout".into()).into();
        assert!(matches!(err, DomainError::Store(RepoError::Query(_))));
        assert!(!err.is_caller_error());
    }
}
