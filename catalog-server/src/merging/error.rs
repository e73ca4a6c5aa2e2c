use super::consistency::ConsistencyViolation;
use crate::storage::StorageError;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use std::fmt;
use thiserror::Error;

/// Kind of catalog entity referenced by [`MergeError::NotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Brand,
    Product,
    ProductVariant,
    GlobalField,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Brand => "Brand",
            EntityKind::Product => "Product",
            EntityKind::ProductVariant => "Product variant",
            EntityKind::GlobalField => "Global field",
        };
        f.write_str(name)
    }
}

/// Merge engine errors
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Products must all belong to brand {expected}, found brand {found}")]
    BrandMismatch { expected: i64, found: i64 },

    #[error("Product {product_id} is already merged")]
    AlreadyMerged { product_id: i64 },

    #[error("Product {0} has no variants")]
    MissingVariants(i64),

    #[error("Variant options are inconsistent: {0}")]
    InconsistentOptions(ConsistencyViolation),

    #[error("Variant {0} has no free option slot")]
    SlotExhausted(i64),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl MergeError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        MergeError::NotFound { kind, id }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        MergeError::InvalidInput(msg.into())
    }
}

impl From<MergeError> for AppError {
    fn from(err: MergeError) -> Self {
        let message = err.to_string();
        match err {
            MergeError::BrandMismatch { expected, found } => {
                AppError::with_message(ErrorCode::BrandMismatch, message)
                    .with_detail("expected_brand_id", expected)
                    .with_detail("found_brand_id", found)
            }
            MergeError::AlreadyMerged { product_id } => {
                AppError::with_message(ErrorCode::ProductAlreadyMerged, message)
                    .with_detail("product_id", product_id)
            }
            MergeError::MissingVariants(product_id) => {
                AppError::with_message(ErrorCode::ProductMissingVariants, message)
                    .with_detail("product_id", product_id)
            }
            MergeError::InconsistentOptions(violation) => {
                let mut app = AppError::with_message(ErrorCode::InconsistentOptions, message)
                    .with_detail("law", violation.law.name());
                if let Some(id) = violation.product_variant_id {
                    app = app.with_detail("product_variant_id", id);
                }
                if let Some(id) = violation.global_field_id {
                    app = app.with_detail("global_field_id", id);
                }
                app
            }
            MergeError::SlotExhausted(variant_id) => {
                AppError::with_message(ErrorCode::OptionSlotExhausted, message)
                    .with_detail("product_variant_id", variant_id)
            }
            MergeError::NotFound { kind, id } => {
                let code = match kind {
                    EntityKind::Brand => ErrorCode::BrandNotFound,
                    EntityKind::Product => ErrorCode::ProductNotFound,
                    EntityKind::ProductVariant => ErrorCode::VariantNotFound,
                    EntityKind::GlobalField => ErrorCode::GlobalFieldNotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            MergeError::InvalidInput(msg) => AppError::validation(msg),
            MergeError::Storage(e) => {
                tracing::error!(error = %e, "Merge storage error");
                AppError::database(e.to_string())
            }
        }
    }
}

pub type MergeResult<T> = Result<T, MergeError>;
