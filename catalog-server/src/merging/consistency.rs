//! Structural laws a merged option set must satisfy

use super::option_value::OptionValue;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// The law a record set broke, checked in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLaw {
    /// Every variant has at least one option
    NoSentinels,
    /// Every variant has a value for every field in use
    Coverage,
    /// No two variants share the same options
    Uniqueness,
}

impl ConsistencyLaw {
    pub fn name(&self) -> &'static str {
        match self {
            ConsistencyLaw::NoSentinels => "no_sentinels",
            ConsistencyLaw::Coverage => "coverage",
            ConsistencyLaw::Uniqueness => "uniqueness",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyViolation {
    pub law: ConsistencyLaw,
    pub product_variant_id: Option<i64>,
    pub global_field_id: Option<i64>,
}

impl fmt::Display for ConsistencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.law {
            ConsistencyLaw::NoSentinels => write!(f, "a variant has no option assigned")?,
            ConsistencyLaw::Coverage => write!(f, "a variant is missing an option value")?,
            ConsistencyLaw::Uniqueness => write!(f, "two variants have identical options")?,
        }
        if let Some(id) = self.product_variant_id {
            write!(f, " (variant {id}")?;
            if let Some(field) = self.global_field_id {
                write!(f, ", field {field}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl ConsistencyViolation {
    fn new(law: ConsistencyLaw, variant: i64, field: Option<i64>) -> Self {
        Self {
            law,
            product_variant_id: Some(variant),
            global_field_id: field,
        }
    }
}

/// Check the record set against every law; an empty set is consistent.
pub fn validate_consistency(records: &[OptionValue]) -> Result<(), ConsistencyViolation> {
    if let Some(sentinel) = records.iter().find(|r| r.is_unassigned()) {
        return Err(ConsistencyViolation::new(
            ConsistencyLaw::NoSentinels,
            sentinel.product_variant_id,
            None,
        ));
    }

    let fields: BTreeSet<i64> = records.iter().filter_map(OptionValue::global_field_id).collect();

    let mut by_variant: BTreeMap<i64, Vec<&OptionValue>> = BTreeMap::new();
    for record in records {
        by_variant
            .entry(record.product_variant_id)
            .or_default()
            .push(record);
    }

    for (&variant_id, variant_records) in &by_variant {
        let valued: Vec<i64> = variant_records
            .iter()
            .filter(|r| r.value().is_some())
            .filter_map(|r| r.global_field_id())
            .collect();
        let valued_set: BTreeSet<i64> = valued.iter().copied().collect();

        if let Some(&missing) = fields.difference(&valued_set).next() {
            return Err(ConsistencyViolation::new(
                ConsistencyLaw::Coverage,
                variant_id,
                Some(missing),
            ));
        }
        if valued.len() != fields.len() {
            let duplicated = valued
                .iter()
                .find(|f| valued.iter().filter(|g| g == f).count() > 1)
                .copied();
            return Err(ConsistencyViolation::new(
                ConsistencyLaw::Coverage,
                variant_id,
                duplicated,
            ));
        }
    }

    let mut signatures: HashMap<Vec<(i64, &str)>, i64> = HashMap::new();
    for (&variant_id, variant_records) in &by_variant {
        let mut signature: Vec<(i64, &str)> = variant_records
            .iter()
            .filter_map(|r| Some((r.global_field_id()?, r.value()?)))
            .collect();
        signature.sort_unstable();
        if signatures.insert(signature, variant_id).is_some() {
            return Err(ConsistencyViolation::new(
                ConsistencyLaw::Uniqueness,
                variant_id,
                None,
            ));
        }
    }

    Ok(())
}

pub fn is_consistent(records: &[OptionValue]) -> bool {
    validate_consistency(records).is_ok()
}
