use crate::error::{BuoyError, Result};
use serde::{Deserialize, Serialize};
use std::mem::replace;

/// Earliest year offered by the year range control.
pub const DEFAULT_FIRST_YEAR: i32 = 2010;

/// Latest year offered by the year range control.
pub const DEFAULT_LAST_YEAR: i32 = 2020;

/// A year range iterator that yields each year from the start year
/// through the end year (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug, Hash, Serialize, Deserialize)]
pub struct YearRange(pub i32, pub i32);

impl YearRange {
    /// Build a range, rejecting an inverted one.
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(BuoyError::InvalidYearRange { start, end });
        }
        Ok(YearRange(start, end))
    }

    pub fn start(&self) -> i32 {
        self.0
    }

    pub fn end(&self) -> i32 {
        self.1
    }

    /// Number of years covered by the range.
    pub fn len(&self) -> usize {
        if self.0 > self.1 {
            0
        } else {
            (i64::from(self.1) - i64::from(self.0) + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange(DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR)
    }
}

impl Iterator for YearRange {
    type Item = i32;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 > self.1 {
            return None;
        }
        match self.0.checked_add(1) {
            Some(next) => Some(replace(&mut self.0, next)),
            None => {
                // i32::MAX was the last year; leave the range empty
                self.1 = self.0 - 1;
                Some(self.0)
            }
        }
    }
}
