//! Calendar day keys for NOTAM sets.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A UTC calendar day (`YYYY-MM-DD`) keying one NOTAM set and one rendered
/// map artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's date in the UTC timezone.
    pub fn today_utc() -> Self {
        Self(Utc::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// File name of the persisted NOTAM list for this day.
    pub fn yaml_name(&self) -> String {
        format!("{}_notams.yaml", self.0.format("%Y-%m-%d"))
    }

    /// File name of the rendered map artifact for this day.
    ///
    /// Deterministic in the date: re-renders overwrite the same file, and
    /// freshness is signalled by a cache-busting timestamp, not the path.
    pub fn image_name(&self) -> String {
        format!("{}_notams.png", self.0.format("%Y-%m-%d"))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(DayKey)
            .map_err(|_| DayParseError::InvalidFormat(s.to_string()))
    }
}

impl TryFrom<String> for DayKey {
    type Error = DayParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DayKey> for String {
    fn from(day: DayKey) -> Self {
        day.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DayParseError {
    #[error("invalid day format (expected YYYY-MM-DD): {0}")]
    InvalidFormat(String),
}
