//! Fixture builders for merge unit tests

use super::candidate::MergeCandidate;
use shared::models::{OptionSlots, Product, ProductVariant};

pub fn product(id: i64, brand_id: i64, parent: Option<i64>) -> Product {
    Product {
        id,
        brand_id,
        parent_product_id: parent,
        name: format!("Product {id}"),
        created_at: 0,
        updated_at: 0,
    }
}

pub fn variant(id: i64, product_id: i64, options: &[(i64, &str)]) -> ProductVariant {
    let mut slots = OptionSlots::default();
    for &(field, value) in options {
        slots.assign(field, Some(value.to_string())).unwrap();
    }
    ProductVariant {
        id,
        product_id,
        default_product_id: None,
        options: slots,
        sku: format!("SKU-{id}"),
        gtin: None,
        stock_quantity: 0,
        price: Default::default(),
        compare_at_price: None,
    }
}

pub fn candidate(id: i64, variants: Vec<ProductVariant>) -> MergeCandidate {
    MergeCandidate {
        product: product(id, 1, None),
        variants,
        is_parent: false,
    }
}

pub fn candidate_in_brand(id: i64, brand_id: i64) -> MergeCandidate {
    MergeCandidate {
        product: product(id, brand_id, None),
        variants: Vec::new(),
        is_parent: false,
    }
}
