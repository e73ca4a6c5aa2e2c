//! Data models
//!
//! Shared between catalog-server and API clients.
//! All IDs are `i64` (snowflake, see [`crate::util::snowflake_id`]).

pub mod brand;
pub mod global_field;
pub mod product;
pub mod product_variant;

// Re-exports
pub use brand::*;
pub use global_field::*;
pub use product::*;
pub use product_variant::*;
