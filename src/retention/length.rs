//! Retention bound
//!
//! The bound is valid in the open interval (0, 32), i.e. 1..=31 snapshots.
//! Construction is the only place the range is checked; every
//! `HistoryLength` value in the program is therefore in range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{RetentionError, RetentionResult};

/// Maximum number of snapshots kept in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct HistoryLength(u8);

impl HistoryLength {
    /// Smallest accepted bound
    pub const MIN: u8 = 1;
    /// Largest accepted bound
    pub const MAX: u8 = 31;
    /// Bound used when nothing is configured
    pub const DEFAULT: HistoryLength = HistoryLength(10);

    /// Validates `value` and wraps it.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when `value <= 0 || value >= 32`.
    pub fn new(value: i64) -> RetentionResult<Self> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(RetentionError::OutOfRange { value });
        }
        Ok(Self(value as u8))
    }

    /// Parses the textual form submitted by a user.
    ///
    /// Surrounding whitespace is ignored. Text that is not an integer fails
    /// with `InvalidLength`; an integer outside the bound with `OutOfRange`.
    pub fn parse(input: &str) -> RetentionResult<Self> {
        let value: i64 = input
            .trim()
            .parse()
            .map_err(|_| RetentionError::InvalidLength {
                input: input.to_string(),
            })?;
        Self::new(value)
    }

    /// Returns the bound as a plain integer
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns the bound as a collection length
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for HistoryLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for HistoryLength {
    type Error = RetentionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HistoryLength> for u8 {
    fn from(length: HistoryLength) -> Self {
        length.0
    }
}

impl FromStr for HistoryLength {
    type Err = RetentionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HistoryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
