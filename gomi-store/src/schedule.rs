//! Day-of-week schedule resolution.

use std::sync::Arc;

use chrono::{Datelike, Local};

use gomi_core::days::Weekday;
use gomi_core::error::CatalogError;
use gomi_core::model::Category;

use crate::store::CatalogStore;

/// Resolves which categories are collected on a given weekday.
pub struct ScheduleResolver {
    store: Arc<CatalogStore>,
}

#[derive(Debug)]
/// Schedule for the current day, carrying the weekday that was computed so
/// callers can display it.
pub struct TodaySchedule {
    /// The local weekday the schedule was resolved for.
    pub day: Weekday,
    /// Categories collected on that day, in store order.
    pub categories: Vec<Category>,
}

impl ScheduleResolver {
    /// Create a resolver bound to the given store.
    #[must_use]
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    /// Categories collected on `day`; `None` returns all categories.
    ///
    /// A category whose stored days did not decode matches no day, so it only
    /// appears in the all-categories case.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] for persistence failures.
    pub fn by_day(&self, day: Option<Weekday>) -> Result<Vec<Category>, CatalogError> {
        let all = self.store.categories()?;
        Ok(match day {
            None => all,
            Some(day) => all
                .into_iter()
                .filter(|category| category.days.contains(&day))
                .collect(),
        })
    }

    /// Resolve the schedule for the current local weekday.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Storage`] for persistence failures.
    pub fn today(&self) -> Result<TodaySchedule, CatalogError> {
        let day = Weekday::from_chrono(Local::now().weekday());
        let categories = self.by_day(Some(day))?;
        Ok(TodaySchedule { day, categories })
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use rusqlite::params;

    use gomi_core::model::NewCategory;

    use super::*;

    fn category(name: &str, days: Vec<Weekday>) -> NewCategory {
        NewCategory {
            name: name.to_owned(),
            days,
            method: "袋に入れて出してください".to_owned(),
            special_days: Vec::new(),
            notion: None,
            types: Vec::new(),
        }
    }

    #[test]
    fn by_day_filters_on_decoded_days() {
        let store = Arc::new(CatalogStore::open_in_memory().unwrap());
        let first = store
            .create_category(&category("可燃ゴミ", vec![Weekday::Monday, Weekday::Thursday]))
            .unwrap();
        store
            .create_category(&category("不燃ゴミ", vec![Weekday::Tuesday]))
            .unwrap();

        let resolver = ScheduleResolver::new(Arc::clone(&store));
        let monday = resolver.by_day(Some(Weekday::Monday)).unwrap();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].id, first.id);

        let sunday = resolver.by_day(Some(Weekday::Sunday)).unwrap();
        assert!(sunday.is_empty());
    }

    #[test]
    fn by_day_none_returns_all() {
        let store = Arc::new(CatalogStore::open_in_memory().unwrap());
        store
            .create_category(&category("可燃ゴミ", vec![Weekday::Monday]))
            .unwrap();
        store
            .create_category(&category("不燃ゴミ", vec![Weekday::Tuesday]))
            .unwrap();

        let resolver = ScheduleResolver::new(store);
        assert_eq!(resolver.by_day(None).unwrap().len(), 2);
    }

    #[test]
    fn legacy_rows_match_their_single_day() {
        let store = Arc::new(CatalogStore::open_in_memory().unwrap());
        {
            let conn = store.lock();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO garbage_categories
                     (category, date, method, special_days, notion, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params!["古紙", "Friday", "ひもで縛る", "[]", None::<String>, now, now],
            )
            .unwrap();
        }

        let resolver = ScheduleResolver::new(store);
        let friday = resolver.by_day(Some(Weekday::Friday)).unwrap();
        assert_eq!(friday.len(), 1);
        assert_eq!(friday[0].name, "古紙");
    }

    #[test]
    fn undecodable_rows_match_no_day() {
        let store = Arc::new(CatalogStore::open_in_memory().unwrap());
        {
            let conn = store.lock();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO garbage_categories
                     (category, date, method, special_days, notion, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params!["粗大ゴミ", "whenever", "申込制", "[]", None::<String>, now, now],
            )
            .unwrap();
        }

        let resolver = ScheduleResolver::new(Arc::clone(&store));
        for day in gomi_core::days::ALL_WEEKDAYS {
            assert!(resolver.by_day(Some(day)).unwrap().is_empty());
        }
        assert_eq!(resolver.by_day(None).unwrap().len(), 1);
    }
}
