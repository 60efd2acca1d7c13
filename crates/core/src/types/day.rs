//! Calendar-day keys for daily usage counters.

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A UTC calendar day in `YYYY-MM-DD` form.
///
/// Daily usage counters are keyed by `(user, day)`; a counter is never read
/// across days, so a new `DayKey` naturally resets the visible count to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    /// The key for the current UTC day.
    #[must_use]
    pub fn today() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The key for the day containing the given instant.
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.date_naive().format("%Y-%m-%d").to_string())
    }

    /// The key for an explicit date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
        Ok(Self::from_date(date))
    }
}
