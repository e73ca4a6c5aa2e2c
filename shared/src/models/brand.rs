//! Brand Model

use serde::{Deserialize, Serialize};

/// Brand entity, owner of products and global fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}
