//! Domain records for waste categories and their garbage types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::days::Weekday;
use crate::error::{CatalogError, DayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a stored category.
pub struct CategoryId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a stored garbage type.
pub struct GarbageTypeId(pub i64);

#[derive(Debug, Clone, Serialize)]
/// A waste-sorting class with its collection schedule and owned garbage types.
pub struct Category {
    /// Store-assigned identifier.
    pub id: CategoryId,
    /// Unique, non-empty category name.
    pub name: String,
    /// Weekdays the category is collected on, already decoded from storage.
    /// Empty means the stored value did not decode; such a category is
    /// collected on no day.
    pub days: Vec<Weekday>,
    /// How the waste must be put out.
    pub method: String,
    /// Extra collection dates outside the weekly schedule.
    pub special_days: Vec<NaiveDate>,
    /// Optional free-text note.
    pub notion: Option<String>,
    /// Garbage types belonging to this category, in insertion order.
    pub types: Vec<GarbageType>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
/// A concrete waste item bound to exactly one category.
pub struct GarbageType {
    /// Store-assigned identifier.
    pub id: GarbageTypeId,
    /// Item name; not required to be unique.
    pub name: String,
    /// Owning category.
    pub category_id: CategoryId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Fields for creating a category together with its initial garbage types.
pub struct NewCategory {
    /// Category name; must be unique and non-blank.
    pub name: String,
    /// Collection weekdays; must not be empty.
    pub days: Vec<Weekday>,
    /// Collection method; must not be blank.
    pub method: String,
    /// Extra collection dates; may be empty.
    #[serde(default)]
    pub special_days: Vec<NaiveDate>,
    /// Optional free-text note.
    #[serde(default)]
    pub notion: Option<String>,
    /// Names of the initial garbage types; blanks are dropped on insert.
    #[serde(default)]
    pub types: Vec<String>,
}

impl NewCategory {
    /// Check the required-field invariants before any row is written.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Validation`] for a blank name or method,
    /// [`CatalogError::InvalidDay`] for an empty day list.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "category name must not be blank".to_owned(),
            ));
        }
        if self.method.trim().is_empty() {
            return Err(CatalogError::Validation(
                "collection method must not be blank".to_owned(),
            ));
        }
        if self.days.is_empty() {
            return Err(CatalogError::InvalidDay(DayError::Empty));
        }
        Ok(())
    }

    /// Trimmed, non-blank garbage type names in input order.
    #[must_use]
    pub fn clean_types(&self) -> Vec<String> {
        self.types
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Partial category update; only supplied fields are applied.
///
/// Supplying `types` replaces the entire garbage-type list for the category.
/// Clearing the note is expressed with an empty string, not by omission.
pub struct CategoryPatch {
    /// New category name.
    pub name: Option<String>,
    /// New collection weekdays.
    pub days: Option<Vec<Weekday>>,
    /// New collection method.
    pub method: Option<String>,
    /// New special collection dates.
    pub special_days: Option<Vec<NaiveDate>>,
    /// New note text.
    pub notion: Option<String>,
    /// Full replacement garbage-type list.
    pub types: Option<Vec<String>>,
}

impl CategoryPatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.days.is_none()
            && self.method.is_none()
            && self.special_days.is_none()
            && self.notion.is_none()
            && self.types.is_none()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fields() -> NewCategory {
        NewCategory {
            name: "可燃ゴミ".to_owned(),
            days: vec![Weekday::Monday],
            method: "専用ゴミ袋に入れて出してください".to_owned(),
            special_days: Vec::new(),
            notion: None,
            types: vec!["生ごみ".to_owned(), "  ".to_owned(), " 紙くず ".to_owned()],
        }
    }

    #[test]
    fn validate_accepts_complete_fields() {
        assert!(fields().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name_and_method() {
        let mut blank_name = fields();
        blank_name.name = "   ".to_owned();
        assert!(matches!(
            blank_name.validate(),
            Err(CatalogError::Validation(_))
        ));

        let mut blank_method = fields();
        blank_method.method = String::new();
        assert!(matches!(
            blank_method.validate(),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_days() {
        let mut no_days = fields();
        no_days.days.clear();
        assert!(matches!(
            no_days.validate(),
            Err(CatalogError::InvalidDay(DayError::Empty))
        ));
    }

    #[test]
    fn clean_types_trims_and_drops_blanks() {
        assert_eq!(fields().clean_types(), vec!["生ごみ", "紙くず"]);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(CategoryPatch::default().is_empty());
        let named = CategoryPatch {
            name: Some("資源ゴミ".to_owned()),
            ..CategoryPatch::default()
        };
        assert!(!named.is_empty());
    }
}
