use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a `"YYYY-MM"` month key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthKeyError {
    #[error("month key must have the form YYYY-MM, got '{0}'")]
    Malformed(String),

    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),

    #[error("year must have four digits, got {0}")]
    YearOutOfRange(i32),
}

/// A calendar month identified by its `"YYYY-MM"` key.
///
/// Ordering follows `(year, month)`, which is the same as lexicographic
/// ordering of the zero-padded string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(
        year: i32,
        month: u32,
    ) -> Result<Self, MonthKeyError> {
        if !(1000..=9999).contains(&year) {
            return Err(MonthKeyError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Parses a zero-padded `"YYYY-MM"` key.
    pub fn parse(s: &str) -> Result<Self, MonthKeyError> {
        let malformed = || MonthKeyError::Malformed(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of the year, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month directly after this one.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Number of months from `self` to `later`; negative when `later` is earlier.
    pub fn months_until(
        &self,
        later: MonthKey,
    ) -> i64 {
        let years = i64::from(later.year) - i64::from(self.year);
        let months = i64::from(later.month) - i64::from(self.month);
        years * 12 + months
    }

    /// January of the given year.
    pub fn first_of_year(year: i32) -> Result<Self, MonthKeyError> {
        Self::new(year, 1)
    }

    /// Iterates `count` consecutive months starting with `self`.
    pub fn iter(
        self,
        count: usize,
    ) -> impl Iterator<Item = MonthKey> {
        std::iter::successors(Some(self), |m| Some(m.next())).take(count)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}
