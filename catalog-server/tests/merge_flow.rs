//! End-to-end merge scenarios against an in-memory catalog

mod common;

use catalog_server::merging::{
    ConsistencyLaw, MergeError, MergeRequest, MergeService, OptionChange, PreviewRequest,
};
use catalog_server::storage::CatalogStorage;
use common::*;

fn request(product_ids: &[i64], parent: Option<i64>, name: Option<&str>) -> MergeRequest {
    MergeRequest {
        brand_id: BRAND,
        product_ids: product_ids.to_vec(),
        parent_product_id: parent,
        parent_product_name: name.map(str::to_string),
        changes: Vec::new(),
    }
}

fn preview(service: &MergeService, product_ids: &[i64]) -> Option<ConsistencyLaw> {
    service
        .preview(&PreviewRequest {
            brand_id: BRAND,
            product_ids: product_ids.to_vec(),
            parent_product_id: None,
        })
        .unwrap()
        .violation
        .map(|v| v.law)
}

fn assert_untouched(storage: &CatalogStorage, product_ids: &[i64]) {
    for &id in product_ids {
        let product = storage.get_product(id).unwrap().unwrap();
        assert_eq!(product.parent_product_id, None, "product {id} was reparented");
        for variant in storage.variants_of(&product).unwrap() {
            assert_eq!(variant.product_id, id);
            assert_eq!(variant.default_product_id, None);
        }
    }
}

#[test]
fn color_size_grid_merges_under_new_parent() {
    let storage = catalog();
    color_size_grid(&storage);
    let service = MergeService::new(storage.clone());

    assert_eq!(preview(&service, &[1, 2, 3]), None);

    let outcome = service
        .merge(&request(&[1, 2, 3], None, Some("Tee")))
        .unwrap();
    assert!(outcome.parent_created);
    assert_eq!(outcome.variants.len(), 9);

    let parent = storage.get_product(outcome.parent_product_id).unwrap().unwrap();
    assert_eq!(parent.name, "Tee");
    assert_eq!(parent.brand_id, BRAND);
    assert_eq!(storage.variants_of(&parent).unwrap().len(), 9);

    let mut children = storage.child_ids(parent.id).unwrap();
    children.sort_unstable();
    assert_eq!(children, vec![1, 2, 3]);

    for id in [1, 2, 3] {
        let child = storage.get_product(id).unwrap().unwrap();
        assert_eq!(child.parent_product_id, Some(parent.id));
        let origin = storage.variants_of(&child).unwrap();
        assert_eq!(origin.len(), 3);
        for variant in origin {
            assert_eq!(variant.product_id, parent.id);
            assert_eq!(variant.default_product_id, Some(id));
        }
    }

    // Options travel with the variant unchanged
    let moved = storage.get_variant(20).unwrap().unwrap();
    assert_eq!(moved.options.value_of(COLOR), Some("Green"));
    assert_eq!(moved.options.value_of(SIZE), Some("Small"));
}

#[test]
fn mismatched_fields_break_coverage() {
    let storage = catalog();
    add_colored_product(&storage, 1, "Red");
    add_colored_product(&storage, 2, "Green");
    add_product(&storage, 3, BRAND);
    for (n, size) in SIZES.iter().enumerate() {
        add_variant(&storage, 30 + n as i64, 3, &[(COLOR, "Blue"), (SIZE_TWO, size)]);
    }
    let service = MergeService::new(storage.clone());

    assert_eq!(preview(&service, &[1, 2, 3]), Some(ConsistencyLaw::Coverage));

    let err = service
        .merge(&request(&[1, 2, 3], None, Some("Tee")))
        .unwrap_err();
    assert!(matches!(
        err,
        MergeError::InconsistentOptions(ref v) if v.law == ConsistencyLaw::Coverage
    ));
    assert_untouched(&storage, &[1, 2, 3]);
}

#[test]
fn identical_options_break_uniqueness() {
    let storage = catalog();
    add_product(&storage, 1, BRAND);
    add_variant(&storage, 10, 1, &[(COLOR, "Red"), (SIZE, "Small")]);
    add_product(&storage, 2, BRAND);
    add_variant(&storage, 20, 2, &[(COLOR, "Red"), (SIZE, "Small")]);
    let service = MergeService::new(storage.clone());

    assert_eq!(preview(&service, &[1, 2]), Some(ConsistencyLaw::Uniqueness));
    assert!(matches!(
        service.merge(&request(&[1, 2], None, Some("Tee"))),
        Err(MergeError::InconsistentOptions(_))
    ));
    assert_untouched(&storage, &[1, 2]);
}

#[test]
fn partial_options_are_fixed_by_changes() {
    let storage = catalog();
    add_colored_product(&storage, 1, "Red");
    add_product(&storage, 2, BRAND);
    add_variant(&storage, 20, 2, &[(COLOR, "Green")]);
    let service = MergeService::new(storage.clone());

    assert_eq!(preview(&service, &[1, 2]), Some(ConsistencyLaw::Coverage));
    assert!(service.merge(&request(&[1, 2], None, Some("Tee"))).is_err());

    let mut fixed = request(&[1, 2], None, Some("Tee"));
    fixed.changes = vec![OptionChange::set(20, SIZE, "Small")];
    let outcome = service.merge(&fixed).unwrap();

    let variant = storage.get_variant(20).unwrap().unwrap();
    assert_eq!(variant.product_id, outcome.parent_product_id);
    assert_eq!(variant.options.value_of(SIZE), Some("Small"));
    assert_eq!(variant.options.value_of(COLOR), Some("Green"));
}

#[test]
fn unsetting_only_option_is_rejected() {
    let storage = catalog();
    add_product(&storage, 1, BRAND);
    add_variant(&storage, 11, 1, &[(COLOR, "Red")]);
    add_product(&storage, 2, BRAND);
    add_variant(&storage, 21, 2, &[(COLOR, "Blue")]);
    let before = storage.get_variant(21).unwrap().unwrap();
    let service = MergeService::new(storage.clone());

    let mut req = request(&[1, 2], None, Some("Tee"));
    req.changes = vec![OptionChange::unset(21, COLOR)];
    let err = service.merge(&req).unwrap_err();
    assert!(matches!(
        err,
        MergeError::InconsistentOptions(ref v)
            if v.law == ConsistencyLaw::NoSentinels && v.product_variant_id == Some(21)
    ));

    assert_untouched(&storage, &[1, 2]);
    assert_eq!(storage.get_variant(21).unwrap().unwrap(), before);
}

#[test]
fn slot_exhaustion_leaves_catalog_unchanged() {
    let storage = catalog();
    for (id, color) in [(1, "Red"), (2, "Green")] {
        add_product(&storage, id, BRAND);
        add_variant(
            &storage,
            id * 10,
            id,
            &[(COLOR, color), (SIZE, "Small"), (SIZE_TWO, "Wide")],
        );
    }
    let before = storage.get_variant(10).unwrap().unwrap();
    let service = MergeService::new(storage.clone());

    // Unsetting clears the value but the field keeps its slot
    let mut req = request(&[1, 2], None, Some("Tee"));
    req.changes = vec![
        OptionChange::unset(10, SIZE_TWO),
        OptionChange::set(10, MATERIAL, "Cotton"),
        OptionChange::unset(20, SIZE_TWO),
        OptionChange::set(20, MATERIAL, "Cotton"),
    ];
    let err = service.merge(&req).unwrap_err();
    assert!(matches!(err, MergeError::SlotExhausted(_)));

    assert_untouched(&storage, &[1, 2]);
    assert_eq!(storage.get_variant(10).unwrap().unwrap(), before);
}

#[test]
fn remerging_same_selection_changes_nothing() {
    let storage = catalog();
    color_size_grid(&storage);
    let service = MergeService::new(storage.clone());

    let first = service
        .merge(&request(&[1, 2, 3], None, Some("Tee")))
        .unwrap();
    let parent_before = storage.get_product(first.parent_product_id).unwrap().unwrap();

    let again = service
        .merge(&request(&[1, 2, 3], Some(first.parent_product_id), None))
        .unwrap();
    assert!(!again.parent_created);
    assert_eq!(again.parent_product_id, first.parent_product_id);
    assert!(again.variants.is_empty());

    let parent_after = storage.get_product(first.parent_product_id).unwrap().unwrap();
    assert_eq!(parent_before, parent_after);
    assert_eq!(storage.variants_of(&parent_after).unwrap().len(), 9);
}

#[test]
fn product_joins_existing_parent() {
    let storage = catalog();
    color_size_grid(&storage);
    add_colored_product(&storage, 4, "Black");
    let service = MergeService::new(storage.clone());

    let parent_id = service
        .merge(&request(&[1, 2, 3], None, Some("Tee")))
        .unwrap()
        .parent_product_id;

    let outcome = service
        .merge(&request(&[4], Some(parent_id), Some("Basic Tee")))
        .unwrap();
    assert_eq!(outcome.variants.len(), 3);

    let parent = storage.get_product(parent_id).unwrap().unwrap();
    assert_eq!(parent.name, "Basic Tee");
    assert_eq!(storage.variants_of(&parent).unwrap().len(), 12);
    assert_eq!(storage.child_ids(parent_id).unwrap().len(), 4);
}

#[test]
fn cross_brand_selection_is_rejected() {
    let storage = catalog();
    add_colored_product(&storage, 1, "Red");
    add_product(&storage, 2, OTHER_BRAND);
    add_variant(&storage, 20, 2, &[(COLOR, "Green"), (SIZE, "Small")]);
    let service = MergeService::new(storage.clone());

    assert!(matches!(
        service.merge(&request(&[1, 2], None, Some("Tee"))),
        Err(MergeError::BrandMismatch { .. })
    ));
    assert_untouched(&storage, &[1, 2]);
}

#[test]
fn merged_product_cannot_join_another_group() {
    let storage = catalog();
    color_size_grid(&storage);
    add_colored_product(&storage, 4, "Black");
    let service = MergeService::new(storage.clone());

    service
        .merge(&request(&[1, 2], None, Some("Tee")))
        .unwrap();

    assert!(matches!(
        service.merge(&request(&[1, 4], None, Some("Other"))),
        Err(MergeError::AlreadyMerged { product_id: 1 })
    ));
    assert_untouched(&storage, &[4]);
}

#[test]
fn unknown_and_empty_products_are_rejected() {
    let storage = catalog();
    add_colored_product(&storage, 1, "Red");
    add_product(&storage, 2, BRAND);
    let service = MergeService::new(storage);

    assert!(matches!(
        service.merge(&request(&[1, 99], None, Some("Tee"))),
        Err(MergeError::NotFound { id: 99, .. })
    ));
    assert!(matches!(
        service.merge(&request(&[1, 2], None, Some("Tee"))),
        Err(MergeError::MissingVariants(2))
    ));
}

#[test]
fn change_for_foreign_variant_is_rejected() {
    let storage = catalog();
    color_size_grid(&storage);
    let service = MergeService::new(storage.clone());

    let mut req = request(&[1, 2], None, Some("Tee"));
    req.changes = vec![OptionChange::set(30, MATERIAL, "Cotton")];
    assert!(matches!(
        service.merge(&req),
        Err(MergeError::InvalidInput(_))
    ));
    assert_untouched(&storage, &[1, 2, 3]);
}

#[test]
fn concurrent_merges_of_same_product_serialize() {
    let storage = catalog();
    color_size_grid(&storage);
    add_colored_product(&storage, 4, "Black");
    let service = MergeService::new(storage.clone());

    let results: Vec<_> = std::thread::scope(|s| {
        let a = s.spawn(|| service.merge(&request(&[1, 2], None, Some("A"))));
        let b = s.spawn(|| service.merge(&request(&[1, 4], None, Some("B"))));
        vec![a.join().unwrap(), b.join().unwrap()]
    });

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(MergeError::AlreadyMerged { product_id: 1 })))
    );
}
