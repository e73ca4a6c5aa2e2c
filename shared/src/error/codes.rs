//! Unified error codes for the catalog services
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Brand errors
//! - 4xxx: Product and merge errors
//! - 5xxx: Global field errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Brand ====================
    /// Brand not found
    BrandNotFound = 3001,
    /// Products belong to different brands
    BrandMismatch = 3002,

    // ==================== 4xxx: Product ====================
    /// Product not found
    ProductNotFound = 4001,
    /// Product variant not found
    VariantNotFound = 4002,
    /// Product is already merged into another parent
    ProductAlreadyMerged = 4101,
    /// Product has no variants
    ProductMissingVariants = 4102,
    /// Variant options are inconsistent
    InconsistentOptions = 4103,
    /// Variant has no free option slot
    OptionSlotExhausted = 4104,

    // ==================== 5xxx: Global field ====================
    /// Global field not found
    GlobalFieldNotFound = 5001,
    /// Global field label already used in brand
    GlobalFieldLabelExists = 5002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",

            // Auth
            ErrorCode::NotAuthenticated => "Not authenticated",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid token",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Brand
            ErrorCode::BrandNotFound => "Brand not found",
            ErrorCode::BrandMismatch => "Products must all belong to the same brand",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::VariantNotFound => "Product variant not found",
            ErrorCode::ProductAlreadyMerged => "Product is already merged",
            ErrorCode::ProductMissingVariants => "Product has no variants",
            ErrorCode::InconsistentOptions => "Variant options are inconsistent",
            ErrorCode::OptionSlotExhausted => "Variant has no free option slot",

            // Global field
            ErrorCode::GlobalFieldNotFound => "Global field not found",
            ErrorCode::GlobalFieldLabelExists => "Global field label already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Brand
            3001 => Ok(ErrorCode::BrandNotFound),
            3002 => Ok(ErrorCode::BrandMismatch),

            // Product
            4001 => Ok(ErrorCode::ProductNotFound),
            4002 => Ok(ErrorCode::VariantNotFound),
            4101 => Ok(ErrorCode::ProductAlreadyMerged),
            4102 => Ok(ErrorCode::ProductMissingVariants),
            4103 => Ok(ErrorCode::InconsistentOptions),
            4104 => Ok(ErrorCode::OptionSlotExhausted),

            // Global field
            5001 => Ok(ErrorCode::GlobalFieldNotFound),
            5002 => Ok(ErrorCode::GlobalFieldLabelExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
