//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
///
/// A product with a non-null `parent_product_id` is a child of a merged
/// product. Parents never have a parent themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub brand_id: i64,
    pub parent_product_id: Option<i64>,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn is_child(&self) -> bool {
        self.parent_product_id.is_some()
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub brand_id: i64,
    pub name: String,
    pub parent_product_id: Option<i64>,
}
