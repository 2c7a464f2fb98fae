//! Date-only and time-only value types.
//!
//! [`XDate`] keeps the month zero-indexed (`0` is January) so that
//! `19/03/2025` becomes `[2025, 2, 19]`. [`XTime`] tracks time of day up to
//! the second, with seconds optional.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A calendar date without a time: `[year, month (0-based), day]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct XDate {
    year: i32,
    month0: u32,
    day: u32,
}

impl XDate {
    /// Create a date from a year, a zero-indexed month and a day.
    ///
    /// No calendar check is performed; see [`XDate::to_naive`].
    #[must_use]
    pub const fn new(year: i32, month0: u32, day: u32) -> Self {
        Self { year, month0, day }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Zero-indexed month.
    #[must_use]
    pub const fn month0(self) -> u32 {
        self.month0
    }

    #[must_use]
    pub const fn day(self) -> u32 {
        self.day
    }

    #[must_use]
    pub fn to_array(self) -> [i64; 3] {
        [
            i64::from(self.year),
            i64::from(self.month0),
            i64::from(self.day),
        ]
    }

    /// The calendar date, or `None` if the components do not name a real day.
    #[must_use]
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0.checked_add(1)?, self.day)
    }
}

impl From<NaiveDate> for XDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0(), date.day())
    }
}

impl Serialize for XDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&self.year)?;
        seq.serialize_element(&self.month0)?;
        seq.serialize_element(&self.day)?;
        seq.end()
    }
}

/// A time of day: `[hours, minutes, seconds?]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct XTime {
    hours: u32,
    minutes: u32,
    seconds: Option<u32>,
}

impl XTime {
    #[must_use]
    pub const fn new(hours: u32, minutes: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds: None,
        }
    }

    #[must_use]
    pub const fn with_seconds(mut self, seconds: u32) -> Self {
        self.seconds = Some(seconds);
        self
    }

    #[must_use]
    pub const fn hours(self) -> u32 {
        self.hours
    }

    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.minutes
    }

    #[must_use]
    pub const fn seconds(self) -> Option<u32> {
        self.seconds
    }

    /// Components as a list; seconds are included only when set.
    #[must_use]
    pub fn to_vec(self) -> Vec<u32> {
        let mut out = vec![self.hours, self.minutes];
        out.extend(self.seconds);
        out
    }

    #[must_use]
    pub fn to_naive(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hours, self.minutes, self.seconds.unwrap_or(0))
    }
}

impl Serialize for XTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let parts = self.to_vec();
        let mut seq = serializer.serialize_seq(Some(parts.len()))?;
        for part in &parts {
            seq.serialize_element(part)?;
        }
        seq.end()
    }
}

/// Number of days in a month, with the month zero-indexed.
///
/// Returns `None` when `month0` is not in `0..12` or the year is outside the
/// supported calendar range.
#[must_use]
pub fn days_in_month(year: i32, month0: u32) -> Option<u32> {
    if month0 >= 12 {
        return None;
    }
    let (next_year, next_month) = if month0 == 11 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}
