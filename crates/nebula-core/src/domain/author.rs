use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author summary joined onto posts for display. Read-only from the blog's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
}
