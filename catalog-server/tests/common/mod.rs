//! Catalog fixtures shared by the integration tests

#![allow(dead_code)]

use catalog_server::storage::CatalogStorage;
use shared::models::{Brand, GlobalField, OptionSlots, Product, ProductVariant};

pub const BRAND: i64 = 1;
pub const OTHER_BRAND: i64 = 2;

pub const COLOR: i64 = 100;
pub const SIZE: i64 = 200;
pub const SIZE_TWO: i64 = 300;
pub const MATERIAL: i64 = 400;

pub const SIZES: [&str; 3] = ["Small", "Medium", "Large"];

/// Storage with two brands and the brand's global fields
pub fn catalog() -> CatalogStorage {
    let storage = CatalogStorage::open_in_memory().unwrap();
    for (id, name) in [(BRAND, "Acme"), (OTHER_BRAND, "Globex")] {
        storage
            .insert_brand(&Brand {
                id,
                name: name.into(),
            })
            .unwrap();
    }
    for (id, label) in [
        (COLOR, "Color"),
        (SIZE, "Size"),
        (SIZE_TWO, "Size Two"),
        (MATERIAL, "Material"),
    ] {
        storage
            .insert_global_field(&GlobalField {
                id,
                brand_id: BRAND,
                label: label.into(),
                shop_reference: None,
                default_value: None,
                mutable: true,
            })
            .unwrap();
    }
    storage
}

pub fn add_product(storage: &CatalogStorage, id: i64, brand_id: i64) -> Product {
    let product = Product {
        id,
        brand_id,
        parent_product_id: None,
        name: format!("Product {id}"),
        created_at: 0,
        updated_at: 0,
    };
    storage.insert_product(&product).unwrap();
    product
}

pub fn add_variant(
    storage: &CatalogStorage,
    id: i64,
    product_id: i64,
    options: &[(i64, &str)],
) -> ProductVariant {
    let mut slots = OptionSlots::default();
    for &(field, value) in options {
        slots.assign(field, Some(value.to_string())).unwrap();
    }
    let variant = ProductVariant {
        id,
        product_id,
        default_product_id: None,
        options: slots,
        sku: format!("SKU-{id}"),
        gtin: None,
        stock_quantity: 5,
        price: Default::default(),
        compare_at_price: None,
    };
    storage.insert_variant(&variant).unwrap();
    variant
}

/// Product `id` with one variant per size, all in `color`.
///
/// Variant ids are `id * 10 + n`.
pub fn add_colored_product(storage: &CatalogStorage, id: i64, color: &str) {
    add_product(storage, id, BRAND);
    for (n, size) in SIZES.iter().enumerate() {
        add_variant(storage, id * 10 + n as i64, id, &[(COLOR, color), (SIZE, size)]);
    }
}

/// Products 1..=3: Red, Green, Blue, each in Small/Medium/Large
pub fn color_size_grid(storage: &CatalogStorage) {
    for (id, color) in [(1, "Red"), (2, "Green"), (3, "Blue")] {
        add_colored_product(storage, id, color);
    }
}
