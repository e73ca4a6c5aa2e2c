//! Display shaping for the merge preview
//!
//! Products keyed by id, each with its variants keyed by id; every variant
//! lists one entry per brand global field, `null` when it has no value.

use crate::merging::{ConsistencyViolation, MergePreview};
use serde::Serialize;
use shared::models::{GlobalField, Product, ProductVariant};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct FieldValueView {
    pub global_field_id: i64,
    pub label: String,
    pub mutable: bool,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantView {
    pub id: i64,
    pub sku: String,
    pub gtin: Option<String>,
    pub fields: Vec<FieldValueView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub parent_product_id: Option<i64>,
    pub variants: BTreeMap<i64, VariantView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewView {
    pub can_be_grouped: bool,
    pub violation: Option<ConsistencyViolation>,
    pub suggested_name: Option<String>,
    pub product_variants: BTreeMap<i64, ProductView>,
}

pub fn present_preview(preview: &MergePreview, fields: &[GlobalField]) -> PreviewView {
    let product_variants = preview
        .candidates
        .iter()
        .map(|c| (c.id(), product_view(&c.product, &c.variants, fields)))
        .collect();

    PreviewView {
        can_be_grouped: preview.can_be_grouped(),
        violation: preview.violation.clone(),
        suggested_name: suggested_name(preview),
        product_variants,
    }
}

/// Target parent's name, else the first selected product's
fn suggested_name(preview: &MergePreview) -> Option<String> {
    preview
        .target
        .as_ref()
        .or_else(|| preview.candidates.first().map(|c| &c.product))
        .map(|p| p.name.clone())
}

fn product_view(product: &Product, variants: &[ProductVariant], fields: &[GlobalField]) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name.clone(),
        parent_product_id: product.parent_product_id,
        variants: variants
            .iter()
            .map(|v| (v.id, variant_view(v, fields)))
            .collect(),
    }
}

fn variant_view(variant: &ProductVariant, fields: &[GlobalField]) -> VariantView {
    VariantView {
        id: variant.id,
        sku: variant.sku.clone(),
        gtin: variant.gtin.clone(),
        fields: fields
            .iter()
            .map(|field| FieldValueView {
                global_field_id: field.id,
                label: field.label.clone(),
                mutable: field.mutable,
                value: variant.options.value_of(field.id).map(str::to_string),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merging::MergeCandidate;
    use shared::models::OptionSlots;

    fn field(id: i64, label: &str) -> GlobalField {
        GlobalField {
            id,
            brand_id: 1,
            label: label.into(),
            shop_reference: None,
            default_value: None,
            mutable: id != 3,
        }
    }

    fn preview() -> MergePreview {
        let product = Product {
            id: 5,
            brand_id: 1,
            parent_product_id: None,
            name: "Tee".into(),
            created_at: 0,
            updated_at: 0,
        };
        let variant = ProductVariant {
            id: 50,
            product_id: 5,
            default_product_id: None,
            options: OptionSlots::default().with(2, "Small").unwrap(),
            sku: "TEE-S".into(),
            gtin: Some("123".into()),
            stock_quantity: 4,
            price: Default::default(),
            compare_at_price: None,
        };
        MergePreview {
            candidates: vec![MergeCandidate {
                product,
                variants: vec![variant],
                is_parent: false,
            }],
            target: None,
            records: Vec::new(),
            violation: None,
        }
    }

    #[test]
    fn every_variant_lists_every_field() {
        let fields = vec![field(1, "Color"), field(2, "Size"), field(3, "Material")];
        let view = present_preview(&preview(), &fields);

        let variant = &view.product_variants[&5].variants[&50];
        assert_eq!(variant.fields.len(), 3);
        assert_eq!(variant.fields[0].value, None);
        assert_eq!(variant.fields[1].value.as_deref(), Some("Small"));
        assert!(!variant.fields[2].mutable);
        assert!(view.can_be_grouped);
        assert_eq!(view.suggested_name.as_deref(), Some("Tee"));
    }

    #[test]
    fn serializes_nested_maps() {
        let view = present_preview(&preview(), &[field(2, "Size")]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json["product_variants"]["5"]["variants"]["50"]["fields"][0]["label"],
            "Size"
        );
        assert!(json["violation"].is_null());
    }
}
