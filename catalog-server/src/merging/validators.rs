//! Eligibility checks run before any option work

use super::candidate::MergeCandidate;
use super::error::{MergeError, MergeResult};
use shared::models::Product;

/// All candidates (and the target) must belong to one brand.
///
/// Returns the shared brand id.
pub fn validate_brand_match(
    candidates: &[MergeCandidate],
    target: Option<&Product>,
    expected_brand_id: Option<i64>,
) -> MergeResult<i64> {
    let first = candidates
        .first()
        .ok_or_else(|| MergeError::invalid("At least one product is required"))?;
    let brand_id = expected_brand_id.unwrap_or(first.product.brand_id);

    let products = candidates.iter().map(|c| &c.product).chain(target);
    for product in products {
        if product.brand_id != brand_id {
            return Err(MergeError::BrandMismatch {
                expected: brand_id,
                found: product.brand_id,
            });
        }
    }
    Ok(brand_id)
}

/// Reject candidates already merged elsewhere.
///
/// A child may only be re-merged into its current parent, and only when
/// that parent is the declared target. A product with children cannot
/// become a child, and the target cannot itself be a child.
pub fn validate_merge_state(
    candidates: &[MergeCandidate],
    target: Option<&Product>,
) -> MergeResult<()> {
    if let Some(target) = target
        && target.is_child()
    {
        return Err(MergeError::AlreadyMerged {
            product_id: target.id,
        });
    }
    let target_id = target.map(|t| t.id);

    for candidate in candidates {
        if Some(candidate.id()) == target_id {
            continue;
        }
        let merged_elsewhere = candidate
            .product
            .parent_product_id
            .is_some_and(|parent| Some(parent) != target_id);
        if merged_elsewhere || candidate.is_parent {
            return Err(MergeError::AlreadyMerged {
                product_id: candidate.id(),
            });
        }
    }
    Ok(())
}
