//! Turns candidate variants into flat option records

use super::candidate::MergeCandidate;
use super::error::{MergeError, MergeResult};
use super::option_value::OptionValue;
use std::collections::HashSet;

/// Extract the option records of every candidate variant.
///
/// Each assigned slot yields one record; a variant with no assigned slot
/// yields a single `Unassigned` record. A variant listed under several
/// candidates is extracted once. Fails if a non-parent product has no
/// variants.
pub fn extract_option_values(candidates: &[MergeCandidate]) -> MergeResult<Vec<OptionValue>> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for candidate in candidates {
        if candidate.variants.is_empty() && !candidate.is_parent {
            return Err(MergeError::MissingVariants(candidate.id()));
        }

        for variant in &candidate.variants {
            if !seen.insert(variant.id) {
                continue;
            }

            let before = records.len();
            records.extend(
                variant
                    .options
                    .assigned()
                    .map(|(field_id, value)| OptionValue::assigned(variant.id, field_id, value)),
            );
            if records.len() == before {
                records.push(OptionValue::unassigned(variant.id));
            }
        }
    }

    Ok(records)
}
