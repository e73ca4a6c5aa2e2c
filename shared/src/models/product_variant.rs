//! Product Variant Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of option slots carried by every variant
pub const MAX_OPTION_SLOTS: usize = 3;

/// One (global field, value) pair of a variant
///
/// A slot may hold a field with no value (field assigned, value cleared),
/// but a value is only ever written together with a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSlot {
    pub global_field_id: Option<i64>,
    pub value: Option<String>,
}

impl OptionSlot {
    pub fn is_free(&self) -> bool {
        self.global_field_id.is_none()
    }
}

/// All slots of the variant are held by other fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no free option slot for global field {global_field_id}")]
pub struct NoFreeSlot {
    pub global_field_id: i64,
}

/// Treat empty strings as "no value"
pub fn normalize_option_value(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Fixed-capacity ordered option slots of a variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSlots([OptionSlot; MAX_OPTION_SLOTS]);

impl OptionSlots {
    pub fn new(slots: [OptionSlot; MAX_OPTION_SLOTS]) -> Self {
        Self(slots)
    }

    pub fn as_slice(&self) -> &[OptionSlot] {
        &self.0
    }

    /// Index of the slot holding `global_field_id`
    pub fn find_by_field(&self, global_field_id: i64) -> Option<usize> {
        self.0
            .iter()
            .position(|slot| slot.global_field_id == Some(global_field_id))
    }

    /// Index of the leftmost slot with no field
    pub fn find_first_empty(&self) -> Option<usize> {
        self.0.iter().position(OptionSlot::is_free)
    }

    /// Set the value of a field.
    ///
    /// Overwrites the slot already holding the field (a `None` value clears
    /// the value but keeps the field), otherwise claims the first free slot.
    /// Returns the index of the written slot.
    pub fn assign(
        &mut self,
        global_field_id: i64,
        value: Option<String>,
    ) -> Result<usize, NoFreeSlot> {
        let index = self
            .find_by_field(global_field_id)
            .or_else(|| self.find_first_empty())
            .ok_or(NoFreeSlot { global_field_id })?;
        self.0[index] = OptionSlot {
            global_field_id: Some(global_field_id),
            value: normalize_option_value(value),
        };
        Ok(index)
    }

    /// Builder form of [`assign`](Self::assign)
    pub fn with(mut self, global_field_id: i64, value: &str) -> Result<Self, NoFreeSlot> {
        self.assign(global_field_id, Some(value.to_string()))?;
        Ok(self)
    }

    pub fn value_of(&self, global_field_id: i64) -> Option<&str> {
        self.find_by_field(global_field_id)
            .and_then(|i| self.0[i].value.as_deref())
    }

    /// Slots holding a field, left to right
    pub fn assigned(&self) -> impl Iterator<Item = (i64, Option<&str>)> {
        self.0
            .iter()
            .filter_map(|slot| Some((slot.global_field_id?, slot.value.as_deref())))
    }

    pub fn has_assignments(&self) -> bool {
        self.0.iter().any(|slot| !slot.is_free())
    }
}

/// Product variant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: i64,
    /// Owning product
    pub product_id: i64,
    /// Pre-merge owner, set when the variant is relocated into a parent
    pub default_product_id: Option<i64>,
    #[serde(default)]
    pub options: OptionSlots,
    pub sku: String,
    pub gtin: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
}

impl ProductVariant {
    /// Product the variant originally belonged to
    pub fn origin_product_id(&self) -> i64 {
        self.default_product_id.unwrap_or(self.product_id)
    }
}

/// Create variant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariantCreate {
    pub product_id: i64,
    pub sku: String,
    pub gtin: Option<String>,
    #[serde(default)]
    pub options: OptionSlots,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
}
