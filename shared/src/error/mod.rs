//! Unified error system for the catalog services
//!
//! - [`ErrorCode`]: numeric codes shared with API clients
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: code, message and structured details
//! - [`ErrorResponse`]: JSON body of a failed request
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Brand errors
//! - 4xxx: Product and merge errors
//! - 5xxx: Global field errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorResponse};
//!
//! let err = AppError::with_message(ErrorCode::ProductAlreadyMerged, "Product 42 is already merged")
//!     .with_detail("product_id", 42);
//!
//! let body = ErrorResponse::from(&err);
//! assert_eq!(body.code, 4101);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorResponse};
