//! Merge orchestration
//!
//! load → brand check → state check → extract → apply changes →
//! consistency → plan → commit. Stops at the first failing step.

use super::applier::apply_option_changes;
use super::candidate::MergeCandidate;
use super::consistency::{ConsistencyViolation, validate_consistency};
use super::error::{EntityKind, MergeError, MergeResult};
use super::executor::{MergeInput, plan_merge};
use super::extractor::extract_option_values;
use super::lock::BrandLocks;
use super::option_value::{OptionChange, OptionValue};
use super::validators::{validate_brand_match, validate_merge_state};
use crate::storage::CatalogStorage;
use serde::{Deserialize, Serialize};
use shared::models::{Product, ProductVariant};
use shared::util::now_millis;

#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub brand_id: i64,
    pub product_ids: Vec<i64>,
    pub parent_product_id: Option<i64>,
    pub parent_product_name: Option<String>,
    pub changes: Vec<OptionChange>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub parent_product_id: i64,
    pub parent_created: bool,
    pub variants: Vec<ProductVariant>,
}

#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub brand_id: i64,
    pub product_ids: Vec<i64>,
    pub parent_product_id: Option<i64>,
}

/// Result of a dry run; eligibility errors are returned as `Err` instead
#[derive(Debug, Clone)]
pub struct MergePreview {
    pub candidates: Vec<MergeCandidate>,
    pub target: Option<Product>,
    pub records: Vec<OptionValue>,
    pub violation: Option<ConsistencyViolation>,
}

impl MergePreview {
    pub fn can_be_grouped(&self) -> bool {
        self.violation.is_none()
    }
}

/// Entry point of the merge engine (blocking; run off the async runtime)
#[derive(Clone)]
pub struct MergeService {
    storage: CatalogStorage,
    locks: BrandLocks,
}

impl MergeService {
    pub fn new(storage: CatalogStorage) -> Self {
        Self {
            storage,
            locks: BrandLocks::new(),
        }
    }

    pub fn storage(&self) -> &CatalogStorage {
        &self.storage
    }

    /// Validate a prospective merge without writing anything
    pub fn preview(&self, request: &PreviewRequest) -> MergeResult<MergePreview> {
        let (candidates, target) =
            self.load(request.brand_id, &request.product_ids, request.parent_product_id)?;

        validate_brand_match(&candidates, target.as_ref(), Some(request.brand_id))?;
        validate_merge_state(&candidates, target.as_ref())?;
        let records = extract_option_values(&candidates)?;
        let violation = validate_consistency(&records).err();

        tracing::debug!(
            brand_id = request.brand_id,
            products = candidates.len(),
            can_be_grouped = violation.is_none(),
            "Merge preview computed"
        );

        Ok(MergePreview {
            candidates,
            target,
            records,
            violation,
        })
    }

    /// Validate and commit a merge
    pub fn merge(&self, request: &MergeRequest) -> MergeResult<MergeOutcome> {
        let lock = self.locks.handle(request.brand_id);
        let _guard = lock.lock();

        tracing::info!(
            brand_id = request.brand_id,
            product_ids = ?request.product_ids,
            parent_product_id = ?request.parent_product_id,
            changes = request.changes.len(),
            "Merging products"
        );

        self.merge_locked(request).inspect_err(|e| match e {
            MergeError::Storage(_) => {}
            rejected => tracing::warn!(
                brand_id = request.brand_id,
                error = %rejected,
                "Merge rejected"
            ),
        })
    }

    fn merge_locked(&self, request: &MergeRequest) -> MergeResult<MergeOutcome> {
        let (candidates, target) =
            self.load(request.brand_id, &request.product_ids, request.parent_product_id)?;

        let brand_id = validate_brand_match(&candidates, target.as_ref(), Some(request.brand_id))?;
        validate_merge_state(&candidates, target.as_ref())?;

        let records = extract_option_values(&candidates)?;
        let records = apply_option_changes(&records, &request.changes)?;
        validate_consistency(&records).map_err(MergeError::InconsistentOptions)?;

        let plan = plan_merge(
            &MergeInput {
                brand_id,
                candidates: &candidates,
                target: target.as_ref(),
                parent_name: request.parent_product_name.as_deref(),
                changes: &request.changes,
            },
            now_millis(),
        )?;

        self.storage.apply_merge_plan(&plan)?;

        tracing::info!(
            target: "audit",
            brand_id,
            parent_product_id = plan.parent.id,
            parent_created = plan.parent_created,
            children = plan.children.len(),
            variants = plan.variants.len(),
            "Products merged"
        );

        Ok(MergeOutcome {
            parent_product_id: plan.parent.id,
            parent_created: plan.parent_created,
            variants: plan.mutated_variants(),
        })
    }

    /// Load candidates (target included) and the target product
    fn load(
        &self,
        brand_id: i64,
        product_ids: &[i64],
        parent_product_id: Option<i64>,
    ) -> MergeResult<(Vec<MergeCandidate>, Option<Product>)> {
        if self.storage.get_brand(brand_id)?.is_none() {
            return Err(MergeError::not_found(EntityKind::Brand, brand_id));
        }

        let target = match parent_product_id {
            Some(id) => Some(
                self.storage
                    .get_product(id)?
                    .ok_or(MergeError::not_found(EntityKind::Product, id))?,
            ),
            None => None,
        };

        let mut ids = product_ids.to_vec();
        if let Some(id) = parent_product_id
            && !ids.contains(&id)
        {
            ids.insert(0, id);
        }

        let mut candidates = self.storage.load_candidates(&ids)?;
        if let Some(&missing) = product_ids
            .iter()
            .find(|id| !candidates.iter().any(|c| c.id() == **id))
        {
            return Err(MergeError::not_found(EntityKind::Product, missing));
        }

        for candidate in &mut candidates {
            if Some(candidate.id()) == parent_product_id {
                candidate.is_parent = true;
            }
        }
        Ok((candidates, target))
    }
}
