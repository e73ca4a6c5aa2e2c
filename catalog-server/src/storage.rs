//! redb-based catalog storage
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `brands` | `brand_id` | `Brand` | Brands |
//! | `products` | `product_id` | `Product` | Products |
//! | `variants` | `variant_id` | `ProductVariant` | Variants |
//! | `global_fields` | `field_id` | `GlobalField` | Option dimensions |
//! | `products_by_parent` | `(parent_id, product_id)` | `()` | Children of a parent |
//! | `variants_by_product` | `(product_id, variant_id)` | `()` | Variants owned by a product |
//! | `variants_by_origin` | `(origin_id, variant_id)` | `()` | Variants relocated from a product |
//! | `fields_by_brand` | `(brand_id, field_id)` | `()` | Global fields of a brand |
//!
//! Values are JSON-serialized. A merge plan is committed in a single write
//! transaction; dropping the transaction before commit discards every write.

use crate::merging::{MergeCandidate, MergePlan};
use redb::{
    Database, ReadableDatabase, ReadableTable, Table, TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::AppError;
use shared::models::{Brand, GlobalField, Product, ProductVariant};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const BRANDS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("brands");
const PRODUCTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("products");
const VARIANTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("variants");
const GLOBAL_FIELDS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("global_fields");

const PRODUCTS_BY_PARENT: TableDefinition<(i64, i64), ()> =
    TableDefinition::new("products_by_parent");
const VARIANTS_BY_PRODUCT: TableDefinition<(i64, i64), ()> =
    TableDefinition::new("variants_by_product");
const VARIANTS_BY_ORIGIN: TableDefinition<(i64, i64), ()> =
    TableDefinition::new("variants_by_origin");
const FIELDS_BY_BRAND: TableDefinition<(i64, i64), ()> = TableDefinition::new("fields_by_brand");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Index points at missing record: {0} {1}")]
    DanglingIndex(&'static str, i64),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        tracing::error!(error = %e, "Catalog storage error");
        AppError::database(e.to_string())
    }
}

/// Catalog storage backed by redb
#[derive(Clone)]
pub struct CatalogStorage {
    db: Arc<Database>,
}

impl CatalogStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and fixtures)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(BRANDS_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(VARIANTS_TABLE)?;
            let _ = write_txn.open_table(GLOBAL_FIELDS_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_BY_PARENT)?;
            let _ = write_txn.open_table(VARIANTS_BY_PRODUCT)?;
            let _ = write_txn.open_table(VARIANTS_BY_ORIGIN)?;
            let _ = write_txn.open_table(FIELDS_BY_BRAND)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Brands ==========

    pub fn insert_brand(&self, brand: &Brand) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(BRANDS_TABLE)?;
            put_json(&mut table, brand.id, brand)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_brand(&self, brand_id: i64) -> StorageResult<Option<Brand>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BRANDS_TABLE)?;
        get_json(&table, brand_id)
    }

    // ========== Products ==========

    pub fn insert_product(&self, product: &Product) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.write_product(&txn, product)?;
        txn.commit()?;
        Ok(())
    }

    pub fn get_product(&self, product_id: i64) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        get_json(&table, product_id)
    }

    /// Ids of the products merged into `parent_id`
    pub fn child_ids(&self, parent_id: i64) -> StorageResult<Vec<i64>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(PRODUCTS_BY_PARENT)?;
        index_range(&index, parent_id)
    }

    /// Write a product, keeping the parent index in sync
    fn write_product(&self, txn: &WriteTransaction, product: &Product) -> StorageResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        let mut by_parent = txn.open_table(PRODUCTS_BY_PARENT)?;

        let previous: Option<Product> = get_json(&table, product.id)?;
        if let Some(old_parent) = previous.and_then(|p| p.parent_product_id) {
            by_parent.remove((old_parent, product.id))?;
        }
        if let Some(parent) = product.parent_product_id {
            by_parent.insert((parent, product.id), ())?;
        }
        put_json(&mut table, product.id, product)?;
        Ok(())
    }

    // ========== Variants ==========

    pub fn insert_variant(&self, variant: &ProductVariant) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.write_variant(&txn, variant)?;
        txn.commit()?;
        Ok(())
    }

    pub fn get_variant(&self, variant_id: i64) -> StorageResult<Option<ProductVariant>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VARIANTS_TABLE)?;
        get_json(&table, variant_id)
    }

    /// Variants of a product.
    ///
    /// A child product lists the variants it originated; any other product
    /// lists the variants it owns.
    pub fn variants_of(&self, product: &Product) -> StorageResult<Vec<ProductVariant>> {
        let read_txn = self.db.begin_read()?;
        let variants = read_txn.open_table(VARIANTS_TABLE)?;
        let ids = if product.is_child() {
            index_range(&read_txn.open_table(VARIANTS_BY_ORIGIN)?, product.id)?
        } else {
            index_range(&read_txn.open_table(VARIANTS_BY_PRODUCT)?, product.id)?
        };
        load_all(&variants, "variant", &ids)
    }

    /// Write a variant, keeping the owner and origin indexes in sync
    fn write_variant(&self, txn: &WriteTransaction, variant: &ProductVariant) -> StorageResult<()> {
        let mut table = txn.open_table(VARIANTS_TABLE)?;
        let mut by_product = txn.open_table(VARIANTS_BY_PRODUCT)?;
        let mut by_origin = txn.open_table(VARIANTS_BY_ORIGIN)?;

        let previous: Option<ProductVariant> = get_json(&table, variant.id)?;
        if let Some(old) = previous {
            by_product.remove((old.product_id, old.id))?;
            if let Some(origin) = old.default_product_id {
                by_origin.remove((origin, old.id))?;
            }
        }
        by_product.insert((variant.product_id, variant.id), ())?;
        if let Some(origin) = variant.default_product_id {
            by_origin.insert((origin, variant.id), ())?;
        }
        put_json(&mut table, variant.id, variant)?;
        Ok(())
    }

    // ========== Global fields ==========

    pub fn insert_global_field(&self, field: &GlobalField) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.write_global_field(&txn, field)?;
        txn.commit()?;
        Ok(())
    }

    /// Insert a field unless its brand already has one with the same label
    /// (ASCII case-insensitive).
    ///
    /// Check and insert share one write transaction. Returns `false`, with
    /// nothing written, when the label is taken.
    pub fn create_global_field(&self, field: &GlobalField) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let taken = {
            let table = txn.open_table(GLOBAL_FIELDS_TABLE)?;
            let ids = index_range(&txn.open_table(FIELDS_BY_BRAND)?, field.brand_id)?;
            load_all::<GlobalField>(&table, "global field", &ids)?
                .iter()
                .any(|f| f.label.eq_ignore_ascii_case(&field.label))
        };
        if taken {
            txn.abort()?;
            return Ok(false);
        }
        self.write_global_field(&txn, field)?;
        txn.commit()?;
        Ok(true)
    }

    fn write_global_field(&self, txn: &WriteTransaction, field: &GlobalField) -> StorageResult<()> {
        let mut table = txn.open_table(GLOBAL_FIELDS_TABLE)?;
        let mut by_brand = txn.open_table(FIELDS_BY_BRAND)?;
        by_brand.insert((field.brand_id, field.id), ())?;
        put_json(&mut table, field.id, field)?;
        Ok(())
    }

    pub fn get_global_field(&self, field_id: i64) -> StorageResult<Option<GlobalField>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(GLOBAL_FIELDS_TABLE)?;
        get_json(&table, field_id)
    }

    /// Global fields of a brand, ordered by id
    pub fn list_global_fields(&self, brand_id: i64) -> StorageResult<Vec<GlobalField>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(GLOBAL_FIELDS_TABLE)?;
        let ids = index_range(&read_txn.open_table(FIELDS_BY_BRAND)?, brand_id)?;
        load_all(&table, "global field", &ids)
    }

    // ========== Merge ==========

    /// Load merge candidates from one read snapshot.
    ///
    /// Unknown ids are skipped; the caller compares against what it asked for.
    /// Duplicate ids are loaded once.
    pub fn load_candidates(&self, product_ids: &[i64]) -> StorageResult<Vec<MergeCandidate>> {
        let read_txn = self.db.begin_read()?;
        let products = read_txn.open_table(PRODUCTS_TABLE)?;
        let variants = read_txn.open_table(VARIANTS_TABLE)?;
        let by_parent = read_txn.open_table(PRODUCTS_BY_PARENT)?;
        let by_product = read_txn.open_table(VARIANTS_BY_PRODUCT)?;
        let by_origin = read_txn.open_table(VARIANTS_BY_ORIGIN)?;

        let mut candidates: Vec<MergeCandidate> = Vec::with_capacity(product_ids.len());
        for &id in product_ids {
            if candidates.iter().any(|c| c.id() == id) {
                continue;
            }
            let Some(product) = get_json::<Product>(&products, id)? else {
                continue;
            };
            let variant_ids = if product.is_child() {
                index_range(&by_origin, id)?
            } else {
                index_range(&by_product, id)?
            };
            let is_parent = !index_range(&by_parent, id)?.is_empty();
            candidates.push(MergeCandidate {
                variants: load_all(&variants, "variant", &variant_ids)?,
                product,
                is_parent,
            });
        }
        Ok(candidates)
    }

    /// Commit a merge plan atomically
    pub fn apply_merge_plan(&self, plan: &MergePlan) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.write_product(&txn, &plan.parent)?;
        for child in &plan.children {
            self.write_product(&txn, child)?;
        }
        for mutation in &plan.variants {
            self.write_variant(&txn, &mutation.after)?;
        }
        txn.commit()?;
        Ok(())
    }
}

// ========== Table helpers ==========

fn get_json<T: DeserializeOwned>(
    table: &impl ReadableTable<i64, &'static [u8]>,
    id: i64,
) -> StorageResult<Option<T>> {
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

fn put_json<T: Serialize>(
    table: &mut Table<'_, i64, &'static [u8]>,
    id: i64,
    value: &T,
) -> StorageResult<()> {
    let bytes = serde_json::to_vec(value)?;
    table.insert(id, bytes.as_slice())?;
    Ok(())
}

/// Second key component of every `(owner, id)` entry for `owner`
fn index_range(index: &impl ReadableTable<(i64, i64), ()>, owner: i64) -> StorageResult<Vec<i64>> {
    let mut ids = Vec::new();
    for result in index.range((owner, i64::MIN)..=(owner, i64::MAX))? {
        let (key, _value) = result?;
        ids.push(key.value().1);
    }
    Ok(ids)
}

fn load_all<T: DeserializeOwned>(
    table: &impl ReadableTable<i64, &'static [u8]>,
    kind: &'static str,
    ids: &[i64],
) -> StorageResult<Vec<T>> {
    ids.iter()
        .map(|&id| get_json(table, id)?.ok_or(StorageError::DanglingIndex(kind, id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OptionSlots;

    fn product(id: i64, parent: Option<i64>) -> Product {
        Product {
            id,
            brand_id: 1,
            parent_product_id: parent,
            name: format!("Product {id}"),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn variant(id: i64, product_id: i64, origin: Option<i64>) -> ProductVariant {
        ProductVariant {
            id,
            product_id,
            default_product_id: origin,
            options: OptionSlots::default(),
            sku: format!("SKU-{id}"),
            gtin: None,
            stock_quantity: 0,
            price: Default::default(),
            compare_at_price: None,
        }
    }

    #[test]
    fn product_roundtrip_and_parent_index() {
        let storage = CatalogStorage::open_in_memory().unwrap();
        storage.insert_product(&product(1, None)).unwrap();
        storage.insert_product(&product(2, Some(1))).unwrap();
        storage.insert_product(&product(3, Some(1))).unwrap();

        assert_eq!(storage.get_product(2).unwrap(), Some(product(2, Some(1))));
        assert_eq!(storage.child_ids(1).unwrap(), vec![2, 3]);

        // Moving a child updates the index
        storage.insert_product(&product(3, None)).unwrap();
        assert_eq!(storage.child_ids(1).unwrap(), vec![2]);
    }

    #[test]
    fn child_lists_originated_variants() {
        let storage = CatalogStorage::open_in_memory().unwrap();
        storage.insert_product(&product(1, None)).unwrap();
        storage.insert_product(&product(2, Some(1))).unwrap();
        storage.insert_variant(&variant(10, 1, None)).unwrap();
        storage.insert_variant(&variant(20, 1, Some(2))).unwrap();

        let parent_variants = storage.variants_of(&product(1, None)).unwrap();
        assert_eq!(parent_variants.len(), 2);

        let child_variants = storage.variants_of(&product(2, Some(1))).unwrap();
        assert_eq!(child_variants.len(), 1);
        assert_eq!(child_variants[0].id, 20);
    }

    #[test]
    fn load_candidates_skips_unknown_and_duplicates() {
        let storage = CatalogStorage::open_in_memory().unwrap();
        storage.insert_product(&product(1, None)).unwrap();
        storage.insert_product(&product(2, Some(1))).unwrap();
        storage.insert_variant(&variant(20, 1, Some(2))).unwrap();

        let candidates = storage.load_candidates(&[1, 2, 2, 99]).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].is_parent);
        assert!(!candidates[1].is_parent);
        assert_eq!(candidates[1].variants.len(), 1);
    }

    #[test]
    fn global_fields_are_brand_scoped() {
        let storage = CatalogStorage::open_in_memory().unwrap();
        for (id, brand) in [(1, 1), (2, 2), (3, 1)] {
            storage
                .insert_global_field(&GlobalField {
                    id,
                    brand_id: brand,
                    label: format!("Field {id}"),
                    shop_reference: None,
                    default_value: None,
                    mutable: true,
                })
                .unwrap();
        }
        let ids: Vec<i64> = storage
            .list_global_fields(1)
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn create_global_field_rejects_taken_label() {
        let storage = CatalogStorage::open_in_memory().unwrap();
        let field = |id: i64, brand_id: i64, label: &str| GlobalField {
            id,
            brand_id,
            label: label.into(),
            shop_reference: None,
            default_value: None,
            mutable: true,
        };

        assert!(storage.create_global_field(&field(1, 1, "Color")).unwrap());
        assert!(!storage.create_global_field(&field(2, 1, "COLOR")).unwrap());
        assert!(storage.get_global_field(2).unwrap().is_none());
        // Labels are unique per brand only
        assert!(storage.create_global_field(&field(3, 2, "Color")).unwrap());

        let created: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (10..14)
                .map(|id| {
                    let storage = storage.clone();
                    s.spawn(move || storage.create_global_field(&field(id, 1, "Size")).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(created.iter().filter(|c| **c).count(), 1);
        assert_eq!(storage.list_global_fields(1).unwrap().len(), 2);
    }

    #[test]
    fn file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.redb");
        {
            let storage = CatalogStorage::open(&path).unwrap();
            storage
                .insert_brand(&Brand {
                    id: 7,
                    name: "Acme".into(),
                })
                .unwrap();
        }
        let storage = CatalogStorage::open(&path).unwrap();
        assert_eq!(storage.get_brand(7).unwrap().unwrap().name, "Acme");
    }
}
