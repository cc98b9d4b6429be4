//! Reverse search from garbage item names to their owning categories.

use std::sync::Arc;

use rusqlite::params;

use gomi_core::error::CatalogError;
use gomi_core::model::{Category, GarbageType};

use crate::store::{CatalogStore, load_category};

/// Looks up garbage types by name fragment.
pub struct ReverseSearch {
    store: Arc<CatalogStore>,
}

#[derive(Debug)]
/// A matched garbage type together with its owning category.
pub struct SearchHit {
    /// The matched garbage type.
    pub garbage_type: GarbageType,
    /// The category it belongs to; always present by invariant.
    pub category: Category,
}

#[derive(Debug)]
/// Outcome of a reverse search. Zero matches is an expected result, not an
/// error.
pub enum SearchOutcome {
    /// At least one garbage type matched.
    Found(Vec<SearchHit>),
    /// Nothing matched the fragment.
    NotFound,
}

impl ReverseSearch {
    /// Create a search component bound to the given store.
    #[must_use]
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    /// Find garbage types whose name contains `fragment` (byte-wise,
    /// case-sensitive substring).
    ///
    /// # Errors
    ///
    /// [`CatalogError::Validation`] when the fragment is blank after
    /// trimming, [`CatalogError::Storage`] for persistence failures.
    pub fn find_by_name(&self, fragment: &str) -> Result<SearchOutcome, CatalogError> {
        let needle = fragment.trim();
        if needle.is_empty() {
            return Err(CatalogError::Validation(
                "search query must not be blank".to_owned(),
            ));
        }

        let conn = self.store.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, category_id, created_at, updated_at
             FROM garbage_types WHERE instr(name, ?1) > 0 ORDER BY id",
        )?;
        let types = stmt
            .query_map(params![needle], crate::store::read_garbage_type)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);

        if types.is_empty() {
            return Ok(SearchOutcome::NotFound);
        }

        let mut hits = Vec::with_capacity(types.len());
        for garbage_type in types {
            let category = load_category(&conn, garbage_type.category_id)?;
            hits.push(SearchHit {
                garbage_type,
                category,
            });
        }
        Ok(SearchOutcome::Found(hits))
    }
}

#[cfg(test)]
mod test {
    use gomi_core::days::Weekday;
    use gomi_core::model::NewCategory;

    use super::*;

    fn seed(store: &CatalogStore) {
        store
            .create_category(&NewCategory {
                name: "資源ゴミ".to_owned(),
                days: vec![Weekday::Saturday],
                method: "種類別に分けて出してください".to_owned(),
                special_days: Vec::new(),
                notion: None,
                types: vec!["ペットボトル".to_owned(), "空き缶".to_owned()],
            })
            .unwrap();
        store
            .create_category(&NewCategory {
                name: "可燃ゴミ".to_owned(),
                days: vec![Weekday::Monday],
                method: "専用ゴミ袋".to_owned(),
                special_days: Vec::new(),
                notion: None,
                types: vec!["生ごみ".to_owned()],
            })
            .unwrap();
    }

    #[test]
    fn substring_match_returns_owning_category() {
        let store = Arc::new(CatalogStore::open_in_memory().unwrap());
        seed(&store);

        let search = ReverseSearch::new(Arc::clone(&store));
        let SearchOutcome::Found(hits) = search.find_by_name("ボトル").unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].garbage_type.name, "ペットボトル");
        assert_eq!(hits[0].category.name, "資源ゴミ");
    }

    #[test]
    fn blank_query_is_a_validation_error() {
        let store = Arc::new(CatalogStore::open_in_memory().unwrap());
        let search = ReverseSearch::new(store);
        assert!(matches!(
            search.find_by_name("   ").unwrap_err(),
            CatalogError::Validation(_)
        ));
        assert!(matches!(
            search.find_by_name("").unwrap_err(),
            CatalogError::Validation(_)
        ));
    }

    #[test]
    fn zero_matches_is_not_found_not_an_error() {
        let store = Arc::new(CatalogStore::open_in_memory().unwrap());
        seed(&store);
        let search = ReverseSearch::new(store);
        assert!(matches!(
            search.find_by_name("存在しないゴミ").unwrap(),
            SearchOutcome::NotFound
        ));
    }

    #[test]
    fn deleted_category_leaves_no_findable_types() {
        let store = Arc::new(CatalogStore::open_in_memory().unwrap());
        seed(&store);

        let search = ReverseSearch::new(Arc::clone(&store));
        let categories = store.categories().unwrap();
        let resource = categories
            .iter()
            .find(|category| category.name == "資源ゴミ")
            .unwrap();
        store.delete_category(resource.id).unwrap();

        assert!(matches!(
            search.find_by_name("ペットボトル").unwrap(),
            SearchOutcome::NotFound
        ));
        // The other category's types are untouched.
        assert!(matches!(
            search.find_by_name("生ごみ").unwrap(),
            SearchOutcome::Found(_)
        ));
    }
}
