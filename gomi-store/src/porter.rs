//! Snapshot export and import reconciliation.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use gomi_core::error::CatalogError;
use gomi_core::snapshot::{CategoryBlock, SNAPSHOT_VERSION, SnapshotDocument, SnapshotMeta};

use crate::store::{CatalogStore, category_id_by_name, count_rows, insert_category, list_categories};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How an imported document is reconciled with existing data.
pub enum ImportPolicy {
    /// Clear the whole catalog first, then insert every block.
    ReplaceAll,
    /// Keep existing categories; blocks whose name already exists are
    /// skipped, not overwritten.
    MergeSkipExisting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Exact counts describing what an import did.
pub struct ImportReport {
    /// Categories inserted by this call.
    pub imported_categories: usize,
    /// Garbage types inserted by this call.
    pub imported_garbage_types: usize,
    /// Blocks skipped because their name already existed.
    pub skipped_categories: usize,
    /// Categories in the store after the operation.
    pub total_categories: usize,
    /// Garbage types in the store after the operation.
    pub total_garbage_types: usize,
}

/// Converts the catalog to and from snapshot documents.
pub struct SnapshotPorter {
    store: Arc<CatalogStore>,
}

impl SnapshotPorter {
    /// Create a porter bound to the given store.
    #[must_use]
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    /// Export the full catalog as an interchange document.
    ///
    /// Stored rows with malformed day or special-day scalars export with
    /// empty lists; this path never fails on legacy data.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] for persistence failures.
    pub fn export(&self) -> Result<SnapshotDocument, CatalogError> {
        let conn = self.store.lock();
        let categories = list_categories(&conn)?;
        let total_garbage_types = categories.iter().map(|category| category.types.len()).sum();
        let blocks: Vec<CategoryBlock> = categories.iter().map(CategoryBlock::from_record).collect();
        Ok(SnapshotDocument {
            metadata: SnapshotMeta {
                export_date: Some(Utc::now()),
                version: SNAPSHOT_VERSION.to_owned(),
                total_categories: blocks.len(),
                total_garbage_types,
            },
            categories: blocks,
        })
    }

    /// Apply a snapshot document under the given policy, atomically.
    ///
    /// The whole call is one transaction: an invalid block anywhere in the
    /// document aborts with no partial writes.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidDay`] / [`CatalogError::Validation`] for an
    /// invalid block, [`CatalogError::DuplicateName`] when
    /// [`ImportPolicy::ReplaceAll`] meets a name duplicated inside the
    /// document itself, [`CatalogError::Storage`] for persistence failures.
    pub fn import(
        &self,
        doc: &SnapshotDocument,
        policy: ImportPolicy,
    ) -> Result<ImportReport, CatalogError> {
        let mut conn = self.store.lock();
        let tx = conn.transaction()?;

        if policy == ImportPolicy::ReplaceAll {
            tx.execute("DELETE FROM garbage_types", [])?;
            tx.execute("DELETE FROM garbage_categories", [])?;
        }

        let mut imported_categories = 0;
        let mut imported_garbage_types = 0;
        let mut skipped_categories = 0;

        for block in &doc.categories {
            let fields = block.to_new_category()?;
            fields.validate()?;

            if policy == ImportPolicy::MergeSkipExisting
                && category_id_by_name(&tx, &fields.name)?.is_some()
            {
                skipped_categories += 1;
                continue;
            }

            let (_, inserted_types) = insert_category(&tx, &fields)?;
            imported_categories += 1;
            imported_garbage_types += inserted_types;
        }

        let total_categories = count_rows(&tx, "garbage_categories")?;
        let total_garbage_types = count_rows(&tx, "garbage_types")?;
        tx.commit()?;

        info!(
            imported_categories,
            imported_garbage_types, skipped_categories, "applied snapshot import"
        );
        Ok(ImportReport {
            imported_categories,
            imported_garbage_types,
            skipped_categories,
            total_categories,
            total_garbage_types,
        })
    }
}
