//! Error taxonomy shared by the catalog store and its callers.

use rusqlite::Error as SqliteError;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while reading or mutating the catalog.
pub enum CatalogError {
    /// A required field is missing or blank, or a date is malformed.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Another category already uses the requested name.
    #[error("Category name already exists: {0}")]
    DuplicateName(String),
    /// No category exists with the given id.
    #[error("Category not found: {0}")]
    NotFound(i64),
    /// A weekday value was rejected on a write path.
    #[error("Invalid collection day: {0}")]
    InvalidDay(#[from] DayError),
    /// A snapshot document does not have the expected structure.
    #[error("Malformed snapshot document: {0}")]
    MalformedDocument(String),
    /// Underlying persistence failure.
    #[error("Storage error: {0}")]
    Storage(#[from] SqliteError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Rejection reasons for weekday input.
pub enum DayError {
    /// Not one of the seven canonical English weekday names.
    #[error("unknown weekday literal: {0}")]
    Unknown(String),
    /// A category must be collected on at least one weekday.
    #[error("collection days must not be empty")]
    Empty,
}
