//! Weekday enumeration and the legacy-tolerant stored encoding of
//! collection days and special collection dates.
//!
//! Categories originally stored a single weekday literal in the `date`
//! column; the schema later grew a JSON-list form without a destructive
//! migration, so every read path must accept both shapes indefinitely.
//! Decoding collapses whatever is stored into one canonical in-memory
//! representation; nothing outside this module branches on the raw shape.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DayError;

/// Date format used for special collection days, e.g. `2024-04-11`.
pub const SPECIAL_DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Canonical weekday literal used as the schedule unit.
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

/// All seven weekdays in calendar order.
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

impl Weekday {
    /// English name of the weekday, exactly as stored.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Map a chrono weekday onto the catalog enumeration.
    #[must_use]
    pub const fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = DayError;

    /// Case-sensitive exact match on the English weekday names.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Monday" => Ok(Weekday::Monday),
            "Tuesday" => Ok(Weekday::Tuesday),
            "Wednesday" => Ok(Weekday::Wednesday),
            "Thursday" => Ok(Weekday::Thursday),
            "Friday" => Ok(Weekday::Friday),
            "Saturday" => Ok(Weekday::Saturday),
            "Sunday" => Ok(Weekday::Sunday),
            other => Err(DayError::Unknown(other.to_owned())),
        }
    }
}

/// Stored `date` scalar in either of its historical shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDays {
    Many(Vec<String>),
    One(String),
}

/// Serialize collection days into the stored JSON-list scalar.
///
/// A singleton still serializes as a one-element list; only the decoder
/// accepts the legacy bare form.
///
/// # Errors
///
/// Returns [`DayError::Empty`] when the sequence has no entries.
pub fn encode_days(days: &[Weekday]) -> Result<String, DayError> {
    if days.is_empty() {
        return Err(DayError::Empty);
    }
    let names: Vec<&str> = days.iter().map(|day| day.name()).collect();
    Ok(serde_json::to_string(&names).expect("weekday name list always serializes"))
}

/// Decode a stored `date` scalar into the canonical weekday sequence.
///
/// Tries the structured JSON form first. A JSON string (the legacy-hybrid
/// state) normalizes to a one-element sequence. Anything that is not JSON is
/// treated as a bare legacy weekday literal. Never fails: unknown entries
/// inside a list are skipped and an unparseable value decodes to an empty
/// sequence, so callers can safely treat such a row as collected on no day.
#[must_use]
pub fn decode_days(stored: &str) -> Vec<Weekday> {
    match serde_json::from_str::<StoredDays>(stored) {
        Ok(StoredDays::Many(names)) => names
            .iter()
            .filter_map(|name| name.parse::<Weekday>().ok())
            .collect(),
        Ok(StoredDays::One(name)) => name.parse().map(|day| vec![day]).unwrap_or_default(),
        Err(_) => stored.parse().map(|day| vec![day]).unwrap_or_default(),
    }
}

/// Serialize special collection dates into the stored JSON-list scalar.
#[must_use]
pub fn encode_special_days(days: &[NaiveDate]) -> String {
    let entries: Vec<String> = days
        .iter()
        .map(|day| day.format(SPECIAL_DAY_FORMAT).to_string())
        .collect();
    serde_json::to_string(&entries).expect("date string list always serializes")
}

/// Decode a stored `special_days` scalar.
///
/// Malformed entries are skipped and a scalar that is not a JSON list
/// decodes to an empty sequence; this path never fails.
#[must_use]
pub fn decode_special_days(stored: &str) -> Vec<NaiveDate> {
    let Ok(entries) = serde_json::from_str::<Vec<String>>(stored) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| NaiveDate::parse_from_str(entry, SPECIAL_DAY_FORMAT).ok())
        .collect()
}
