//! Folds caller option changes into extracted records

use super::error::{MergeError, MergeResult};
use super::option_value::{OptionAssignment, OptionChange, OptionValue};
use std::collections::HashSet;

/// Apply `changes` to `records`, returning a new record set.
///
/// Idempotent: applying the same changes twice gives the same result.
pub fn apply_option_changes(
    records: &[OptionValue],
    changes: &[OptionChange],
) -> MergeResult<Vec<OptionValue>> {
    let known: HashSet<i64> = records.iter().map(|r| r.product_variant_id).collect();
    if let Some(change) = changes
        .iter()
        .find(|c| !known.contains(&c.product_variant_id))
    {
        return Err(MergeError::invalid(format!(
            "There is an issue with the variants: variant {} is not part of this merge",
            change.product_variant_id
        )));
    }

    Ok(changes.iter().fold(records.to_vec(), apply_one))
}

fn apply_one(records: Vec<OptionValue>, change: &OptionChange) -> Vec<OptionValue> {
    let matches = |r: &OptionValue| {
        r.product_variant_id == change.product_variant_id
            && r.global_field_id() == Some(change.global_field_id)
    };
    let found = records.iter().any(matches);

    match (found, change.normalized_value()) {
        (true, None) => {
            let mut kept: Vec<OptionValue> = records.into_iter().filter(|r| !matches(r)).collect();
            // A variant never leaves the working set
            if !kept
                .iter()
                .any(|r| r.product_variant_id == change.product_variant_id)
            {
                kept.push(OptionValue::unassigned(change.product_variant_id));
            }
            kept
        }
        (true, Some(value)) => records
            .into_iter()
            .map(|r| {
                if matches(&r) {
                    OptionValue {
                        product_variant_id: r.product_variant_id,
                        assignment: OptionAssignment::Assigned {
                            global_field_id: change.global_field_id,
                            value: Some(value.clone()),
                        },
                    }
                } else {
                    r
                }
            })
            .collect(),
        (false, Some(value)) => records
            .into_iter()
            .filter(|r| !(r.product_variant_id == change.product_variant_id && r.is_unassigned()))
            .chain(std::iter::once(OptionValue::assigned(
                change.product_variant_id,
                change.global_field_id,
                Some(&value),
            )))
            .collect(),
        // Unsetting an unset field
        (false, None) => records,
    }
}
