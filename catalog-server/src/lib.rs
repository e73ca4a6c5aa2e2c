//! catalog-server: product catalog service with a product merge engine
//!
//! - [`merging`]: merge consistency and execution engine
//! - [`storage`]: redb-backed catalog storage
//! - [`api`]: HTTP routes (axum)
//! - [`auth`]: editor JWT authentication

pub mod api;
pub mod auth;
pub mod config;
pub mod logger;
pub mod merging;
pub mod state;
pub mod storage;

pub use config::Config;
pub use state::AppState;
