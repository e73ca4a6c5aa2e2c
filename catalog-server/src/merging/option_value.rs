//! Transient option assignment records

use serde::{Deserialize, Serialize};
use shared::models::normalize_option_value;

/// What a variant has for one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionAssignment {
    Assigned {
        global_field_id: i64,
        value: Option<String>,
    },
    /// The variant has no option at all
    Unassigned,
}

/// One option record of a variant in the merge working set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub product_variant_id: i64,
    pub assignment: OptionAssignment,
}

impl OptionValue {
    pub fn assigned(product_variant_id: i64, global_field_id: i64, value: Option<&str>) -> Self {
        Self {
            product_variant_id,
            assignment: OptionAssignment::Assigned {
                global_field_id,
                value: value.map(str::to_string),
            },
        }
    }

    pub fn unassigned(product_variant_id: i64) -> Self {
        Self {
            product_variant_id,
            assignment: OptionAssignment::Unassigned,
        }
    }

    pub fn global_field_id(&self) -> Option<i64> {
        match &self.assignment {
            OptionAssignment::Assigned {
                global_field_id, ..
            } => Some(*global_field_id),
            OptionAssignment::Unassigned => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.assignment {
            OptionAssignment::Assigned { value, .. } => value.as_deref(),
            OptionAssignment::Unassigned => None,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self.assignment, OptionAssignment::Unassigned)
    }
}

/// Caller-proposed option change; `None` unsets the field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChange {
    pub product_variant_id: i64,
    pub global_field_id: i64,
    #[serde(default)]
    pub value: Option<String>,
}

impl OptionChange {
    pub fn set(product_variant_id: i64, global_field_id: i64, value: &str) -> Self {
        Self {
            product_variant_id,
            global_field_id,
            value: Some(value.to_string()),
        }
    }

    pub fn unset(product_variant_id: i64, global_field_id: i64) -> Self {
        Self {
            product_variant_id,
            global_field_id,
            value: None,
        }
    }

    /// Value with empty strings treated as unset
    pub fn normalized_value(&self) -> Option<String> {
        normalize_option_value(self.value.clone())
    }
}
