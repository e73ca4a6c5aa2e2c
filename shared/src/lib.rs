//! Shared types for the catalog services
//!
//! Catalog models (brands, products, variants, global fields), the unified
//! error system and small utilities used by every crate in the workspace.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
