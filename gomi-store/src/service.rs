//! High-level facade combining the store and its query services.

use std::sync::Arc;

use gomi_core::days::Weekday;
use gomi_core::error::CatalogError;
use gomi_core::model::{Category, CategoryId, CategoryPatch, NewCategory};
use gomi_core::snapshot::SnapshotDocument;

use crate::porter::{ImportPolicy, ImportReport, SnapshotPorter};
use crate::schedule::{ScheduleResolver, TodaySchedule};
use crate::search::{ReverseSearch, SearchOutcome};
use crate::store::CatalogStore;

/// Public entry point for the catalog; the transport layer talks to this.
pub struct GomiService {
    store: Arc<CatalogStore>,
    resolver: ScheduleResolver,
    search: ReverseSearch,
    porter: SnapshotPorter,
}

impl GomiService {
    /// Create a service bound to the provided store.
    #[must_use]
    pub fn new(store: Arc<CatalogStore>) -> Self {
        let resolver = ScheduleResolver::new(Arc::clone(&store));
        let search = ReverseSearch::new(Arc::clone(&store));
        let porter = SnapshotPorter::new(Arc::clone(&store));
        Self {
            store,
            resolver,
            search,
            porter,
        }
    }

    /// All categories in store order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the store read fails.
    pub fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.store.categories()
    }

    /// A single category by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    pub fn category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.store.category(id)
    }

    /// Categories collected on `day`; `None` returns all.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the store read fails.
    pub fn by_day(&self, day: Option<Weekday>) -> Result<Vec<Category>, CatalogError> {
        self.resolver.by_day(day)
    }

    /// Schedule for the current local weekday.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the store read fails.
    pub fn today(&self) -> Result<TodaySchedule, CatalogError> {
        self.resolver.today()
    }

    /// Reverse search by garbage item name fragment.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for a blank fragment.
    pub fn find_by_name(&self, fragment: &str) -> Result<SearchOutcome, CatalogError> {
        self.search.find_by_name(fragment)
    }

    /// Create a category with its initial garbage types.
    ///
    /// # Errors
    ///
    /// See [`CatalogStore::create_category`].
    pub fn create_category(&self, fields: &NewCategory) -> Result<Category, CatalogError> {
        self.store.create_category(fields)
    }

    /// Apply a partial update to a category.
    ///
    /// # Errors
    ///
    /// See [`CatalogStore::update_category`].
    pub fn update_category(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, CatalogError> {
        self.store.update_category(id, patch)
    }

    /// Delete a category and, with it, all its garbage types.
    ///
    /// # Errors
    ///
    /// See [`CatalogStore::delete_category`].
    pub fn delete_category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.store.delete_category(id)
    }

    /// Export the full catalog as an interchange document.
    ///
    /// # Errors
    ///
    /// See [`SnapshotPorter::export`].
    pub fn export(&self) -> Result<SnapshotDocument, CatalogError> {
        self.porter.export()
    }

    /// Apply an interchange document under the given policy.
    ///
    /// # Errors
    ///
    /// See [`SnapshotPorter::import`].
    pub fn import(
        &self,
        doc: &SnapshotDocument,
        policy: ImportPolicy,
    ) -> Result<ImportReport, CatalogError> {
        self.porter.import(doc, policy)
    }

    /// Parse JSON text as an interchange document and apply it.
    ///
    /// # Errors
    ///
    /// [`CatalogError::MalformedDocument`] when the text does not parse as a
    /// document; otherwise see [`SnapshotPorter::import`].
    pub fn import_json(&self, text: &str, policy: ImportPolicy) -> Result<ImportReport, CatalogError> {
        let doc = SnapshotDocument::from_json_str(text)?;
        self.porter.import(&doc, policy)
    }
}
