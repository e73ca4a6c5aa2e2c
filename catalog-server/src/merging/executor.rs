//! Computes the state transition of a merge
//!
//! Planning is pure apart from id generation: nothing is written until the
//! storage layer commits the returned [`MergePlan`] in one transaction.

use super::candidate::MergeCandidate;
use super::error::{MergeError, MergeResult};
use super::option_value::OptionChange;
use serde::Serialize;
use shared::models::{Product, ProductVariant};
use shared::util::snowflake_id;
use std::collections::{HashMap, HashSet};

/// Everything the executor needs, already validated
#[derive(Debug, Clone, Copy)]
pub struct MergeInput<'a> {
    pub brand_id: i64,
    pub candidates: &'a [MergeCandidate],
    pub target: Option<&'a Product>,
    pub parent_name: Option<&'a str>,
    pub changes: &'a [OptionChange],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantMutation {
    pub before: ProductVariant,
    pub after: ProductVariant,
}

/// Writes a merge commits
#[derive(Debug, Clone, Serialize)]
pub struct MergePlan {
    pub parent: Product,
    pub parent_created: bool,
    /// Children with their parent set to `parent`
    pub children: Vec<Product>,
    /// Variants whose options or owner change
    pub variants: Vec<VariantMutation>,
}

impl MergePlan {
    pub fn mutated_variants(&self) -> Vec<ProductVariant> {
        self.variants.iter().map(|m| m.after.clone()).collect()
    }
}

pub fn plan_merge(input: &MergeInput<'_>, now: i64) -> MergeResult<MergePlan> {
    let (parent, parent_created) = resolve_parent(input, now)?;

    let mut changes_by_variant: HashMap<i64, Vec<&OptionChange>> = HashMap::new();
    for change in input.changes {
        changes_by_variant
            .entry(change.product_variant_id)
            .or_default()
            .push(change);
    }

    let mut seen = HashSet::new();
    let mut children = Vec::new();
    let mut variants = Vec::new();

    let (own, child_candidates): (Vec<&MergeCandidate>, Vec<&MergeCandidate>) = input
        .candidates
        .iter()
        .partition(|c| c.id() == parent.id);

    for child in child_candidates {
        let mut product = child.product.clone();
        if product.parent_product_id != Some(parent.id) {
            product.parent_product_id = Some(parent.id);
            product.updated_at = now;
        }
        children.push(product);

        for variant in &child.variants {
            if !seen.insert(variant.id) {
                continue;
            }
            let mut after = with_changes(variant, changes_by_variant.get(&variant.id))?;
            if after.product_id != parent.id {
                after.default_product_id = Some(child.id());
                after.product_id = parent.id;
            }
            push_if_changed(&mut variants, variant, after);
        }
    }

    // Variants already owned by the parent keep their owner
    for candidate in &own {
        for variant in &candidate.variants {
            if !seen.insert(variant.id) {
                continue;
            }
            let after = with_changes(variant, changes_by_variant.get(&variant.id))?;
            push_if_changed(&mut variants, variant, after);
        }
    }

    if let Some(change) = input
        .changes
        .iter()
        .find(|c| !seen.contains(&c.product_variant_id))
    {
        return Err(MergeError::invalid(format!(
            "There is an issue with the variants: variant {} is not part of this merge",
            change.product_variant_id
        )));
    }

    Ok(MergePlan {
        parent,
        parent_created,
        children,
        variants,
    })
}

fn resolve_parent(input: &MergeInput<'_>, now: i64) -> MergeResult<(Product, bool)> {
    let name = input
        .parent_name
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match input.target {
        Some(target) => {
            let mut parent = target.clone();
            if let Some(name) = name
                && name != parent.name
            {
                parent.name = name.to_string();
                parent.updated_at = now;
            }
            Ok((parent, false))
        }
        None => {
            let name = name.ok_or_else(|| {
                MergeError::invalid("parent_product_name is required when no parent is given")
            })?;
            let parent = Product {
                id: snowflake_id(),
                brand_id: input.brand_id,
                parent_product_id: None,
                name: name.to_string(),
                created_at: now,
                updated_at: now,
            };
            Ok((parent, true))
        }
    }
}

/// Apply option changes to a copy of the variant's slots
fn with_changes(
    variant: &ProductVariant,
    changes: Option<&Vec<&OptionChange>>,
) -> MergeResult<ProductVariant> {
    let mut after = variant.clone();
    for change in changes.into_iter().flatten() {
        let value = change.normalized_value();
        // Unsetting a field the variant never had
        if value.is_none() && after.options.find_by_field(change.global_field_id).is_none() {
            continue;
        }
        after
            .options
            .assign(change.global_field_id, value)
            .map_err(|_| MergeError::SlotExhausted(variant.id))?;
    }
    Ok(after)
}

fn push_if_changed(out: &mut Vec<VariantMutation>, before: &ProductVariant, after: ProductVariant) {
    if &after != before {
        out.push(VariantMutation {
            before: before.clone(),
            after,
        });
    }
}
