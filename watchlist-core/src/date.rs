//! Tri-precision dates for watchlist records.
//!
//! Sanctions lists carry dates at mixed precision: a birth date may be a
//! full `1970-03-14`, a year-month `1970-03`, or a bare `1970`. An absent
//! date is distinct from any populated one, so callers hold
//! `Option<EntityDate>` rather than a sentinel zero value.
//!
//! ## Comparison Semantics
//!
//! Two dates [`matches`](EntityDate::matches) when every component present
//! on *both* sides is equal. A year-only query date therefore matches a
//! fully-precise candidate date in the same year, but `1971` never matches
//! `1970-03-14`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A calendar date at year, year-month, or year-month-day precision.
///
/// Invariant: `day` is only present when `month` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

impl EntityDate {
    /// Year-precision date.
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Year-month precision date. Returns `None` for an out-of-range month.
    pub fn year_month(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self {
            year,
            month: Some(month),
            day: None,
        })
    }

    /// Full-precision date, validated against the calendar.
    pub fn year_month_day(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self {
            year,
            month: Some(month),
            day: Some(day),
        })
    }

    /// Parse a date accepting, in order, `YYYY-MM-DD`, `YYYY-MM`, `YYYY`.
    ///
    /// Returns `None` for empty or unparseable input. Query handling treats
    /// an unparseable date as absent, not as an error.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut parts = input.splitn(3, '-');
        let year: i32 = parts.next()?.parse().ok()?;
        match (parts.next(), parts.next()) {
            (Some(m), Some(d)) => {
                let month: u32 = m.parse().ok()?;
                let day: u32 = d.parse().ok()?;
                Self::year_month_day(year, month, day)
            }
            (Some(m), None) => {
                let month: u32 = m.parse().ok()?;
                Self::year_month(year, month)
            }
            (None, _) => Some(Self::year(year)),
        }
    }

    /// Whether every component present on both sides is equal.
    ///
    /// This is the match rule from the scoring model: `1970` matches
    /// `1970-03-14`, `1970-03` matches `1970-03-14`, and `1970-04` does not.
    pub fn matches(&self, other: &EntityDate) -> bool {
        if self.year != other.year {
            return false;
        }
        if let (Some(a), Some(b)) = (self.month, other.month) {
            if a != b {
                return false;
            }
        }
        if let (Some(a), Some(b)) = (self.day, other.day) {
            if a != b {
                return false;
            }
        }
        true
    }

    /// Whether the two dates are equal at identical precision.
    pub fn matches_exact(&self, other: &EntityDate) -> bool {
        self == other
    }
}

impl fmt::Display for EntityDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(m), Some(d)) => write!(f, "{:04}-{:02}-{:02}", self.year, m, d),
            (Some(m), None) => write!(f, "{:04}-{:02}", self.year, m),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

impl FromStr for EntityDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::invalid_date(s.to_string()))
    }
}

impl Serialize for EntityDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EntityDate::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s:?}")))
    }
}
