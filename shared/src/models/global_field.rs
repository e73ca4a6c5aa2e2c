//! Global Field Model

use serde::{Deserialize, Serialize};

/// Brand-scoped option dimension (e.g. "Color")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalField {
    pub id: i64,
    pub brand_id: i64,
    pub label: String,
    /// External reference in the shop system
    pub shop_reference: Option<String>,
    pub default_value: Option<serde_json::Value>,
    /// Whether users may edit values (false = synced by the system)
    pub mutable: bool,
}

/// Create global field payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalFieldCreate {
    pub label: String,
    pub shop_reference: Option<String>,
    pub default_value: Option<serde_json::Value>,
    #[serde(default = "default_mutable")]
    pub mutable: bool,
}

fn default_mutable() -> bool {
    true
}
