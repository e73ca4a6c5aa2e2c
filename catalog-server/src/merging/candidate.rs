use serde::Serialize;
use shared::models::{Product, ProductVariant};

/// A product taking part in a merge, with its variants pre-loaded
#[derive(Debug, Clone, Serialize)]
pub struct MergeCandidate {
    pub product: Product,
    pub variants: Vec<ProductVariant>,
    /// Product has children, or is the declared merge target
    pub is_parent: bool,
}

impl MergeCandidate {
    pub fn id(&self) -> i64 {
        self.product.id
    }
}
