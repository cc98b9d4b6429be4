//! Snapshot interchange document and its codec.
//!
//! The wire format matches the catalog's original JSON backups: a
//! `metadata` block plus one entry per category under `categories`, with the
//! historical field names (`category`, `date`, `notion`, `garbage_types`).
//! Documents written before the multi-day migration carry a single weekday
//! literal in `date`; the codec normalizes both forms.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::days::{SPECIAL_DAY_FORMAT, Weekday};
use crate::error::CatalogError;
use crate::model::{Category, NewCategory};

/// Schema version written into exported snapshot metadata.
pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
/// Metadata block describing an exported snapshot.
///
/// Every field is tolerated if absent on import; only the category list
/// matters when applying a document.
pub struct SnapshotMeta {
    /// Moment the snapshot was produced.
    pub export_date: Option<DateTime<Utc>>,
    /// Interchange schema version.
    pub version: String,
    /// Number of category blocks in the document.
    pub total_categories: usize,
    /// Number of garbage-type names across all blocks.
    pub total_garbage_types: usize,
}

impl Default for SnapshotMeta {
    fn default() -> Self {
        Self {
            export_date: None,
            version: SNAPSHOT_VERSION.to_owned(),
            total_categories: 0,
            total_garbage_types: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Full-catalog interchange document.
pub struct SnapshotDocument {
    /// Export metadata.
    #[serde(default)]
    pub metadata: SnapshotMeta,
    /// One block per category.
    pub categories: Vec<CategoryBlock>,
}

impl SnapshotDocument {
    /// Parse an interchange document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedDocument`] when the text is not a
    /// document with the expected category-list structure, including a block
    /// missing one of its required fields.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(text).map_err(|err| CatalogError::MalformedDocument(err.to_string()))
    }

    /// Serialize the document as pretty-printed JSON, the on-disk backup form.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedDocument`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| CatalogError::MalformedDocument(err.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
/// The `date` field of a block: a single legacy weekday literal or a list.
pub enum DayField {
    /// Legacy single-weekday form.
    One(String),
    /// Multi-day list form; exports always use this shape.
    Many(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One category in the interchange document.
pub struct CategoryBlock {
    /// Category name (the `category` wire field).
    #[serde(rename = "category")]
    pub name: String,
    /// Collection weekdays.
    pub date: DayField,
    /// Collection method instructions.
    pub method: String,
    /// Special collection dates as ISO strings.
    #[serde(default)]
    pub special_days: Vec<String>,
    /// Optional free-text note.
    #[serde(default)]
    pub notion: Option<String>,
    /// Names of the garbage types belonging to the category.
    #[serde(default)]
    pub garbage_types: Vec<String>,
}

impl CategoryBlock {
    /// Build the export block for a stored category.
    ///
    /// Decoding already happened at the store boundary, where malformed
    /// stored data became an empty list, so this conversion cannot fail.
    #[must_use]
    pub fn from_record(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            date: DayField::Many(
                category
                    .days
                    .iter()
                    .map(|day| day.name().to_owned())
                    .collect(),
            ),
            method: category.method.clone(),
            special_days: category
                .special_days
                .iter()
                .map(|day| day.format(SPECIAL_DAY_FORMAT).to_string())
                .collect(),
            notion: category.notion.clone(),
            garbage_types: category
                .types
                .iter()
                .map(|garbage_type| garbage_type.name.clone())
                .collect(),
        }
    }

    /// Convert the block into create fields, normalizing `date` to a list.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidDay`] for an unrecognized weekday literal,
    /// [`CatalogError::Validation`] for a malformed special day.
    pub fn to_new_category(&self) -> Result<NewCategory, CatalogError> {
        let days = match &self.date {
            DayField::One(name) => vec![name.parse::<Weekday>()?],
            DayField::Many(names) => names
                .iter()
                .map(|name| name.parse::<Weekday>())
                .collect::<Result<Vec<_>, _>>()?,
        };
        let special_days = self
            .special_days
            .iter()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, SPECIAL_DAY_FORMAT).map_err(|err| {
                    CatalogError::Validation(format!("malformed special day {raw}: {err}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NewCategory {
            name: self.name.clone(),
            days,
            method: self.method.clone(),
            special_days,
            notion: self.notion.clone(),
            types: self.garbage_types.clone(),
        })
    }
}
