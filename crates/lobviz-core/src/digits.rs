//! Digit frequency by position over fixed-width numeric timestamps.
//!
//! Each distinct timestamp is normalized to 19 zero-padded digits and every
//! `(digit, position)` pair is counted once per timestamp. The matrix shows
//! which positions of a nanosecond clock actually vary in a feed.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::batch::SkippedRow;
use crate::table::TabularRow;

pub const DIGITS: usize = 10;
pub const POSITIONS: usize = 19;

/// One cell of the flattened matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DigitCell {
    pub digit: u8,
    pub position: usize,
    pub count: u64,
    /// Share of distinct timestamps, in percent, rounded to 2 decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitFrequency {
    counts: [[u64; POSITIONS]; DIGITS],
    distinct: usize,
    rejected: usize,
}

impl Default for DigitFrequency {
    fn default() -> Self {
        Self {
            counts: [[0; POSITIONS]; DIGITS],
            distinct: 0,
            rejected: 0,
        }
    }
}

impl DigitFrequency {
    /// Counts the distinct valid values among `values`.
    ///
    /// Input order and duplicates do not affect the result.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rejected = 0;
        let mut normalized = BTreeSet::new();
        for value in values {
            match normalize(value.as_ref()) {
                Some(padded) => {
                    normalized.insert(padded);
                }
                None => {
                    tracing::warn!(value = value.as_ref(), "rejecting non-digit timestamp");
                    rejected += 1;
                }
            }
        }

        let mut frequency = Self {
            rejected,
            ..Self::default()
        };
        for padded in &normalized {
            for (position, byte) in padded.bytes().enumerate() {
                frequency.counts[usize::from(byte - b'0')][position] += 1;
            }
        }
        frequency.distinct = normalized.len();
        frequency
    }

    /// Reads `column` from each row. Rows lacking it are reported as skipped.
    pub fn from_rows(rows: &[TabularRow], column: &str) -> (Self, Vec<SkippedRow>) {
        let mut skipped = Vec::new();
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            match row.text(column) {
                Ok(value) => match normalize(value) {
                    Some(_) => values.push(value),
                    None => skipped.push(SkippedRow {
                        line: row.line(),
                        reason: format!("'{value}' is not a timestamp of up to {POSITIONS} digits"),
                    }),
                },
                Err(error) => skipped.push(SkippedRow {
                    line: row.line(),
                    reason: error.to_string(),
                }),
            }
        }

        for row in &skipped {
            tracing::warn!(line = row.line, reason = %row.reason, "skipping row");
        }
        (Self::from_values(values), skipped)
    }

    pub fn count(&self, digit: u8, position: usize) -> u64 {
        self.counts
            .get(usize::from(digit))
            .and_then(|row| row.get(position))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct timestamps counted.
    pub const fn distinct(&self) -> usize {
        self.distinct
    }

    pub const fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn max_count(&self) -> u64 {
        self.counts
            .iter()
            .flat_map(|row| row.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Row-major cells, digit 0 first.
    pub fn cells(&self) -> Vec<DigitCell> {
        let mut cells = Vec::with_capacity(DIGITS * POSITIONS);
        for (digit, row) in self.counts.iter().enumerate() {
            for (position, count) in row.iter().enumerate() {
                cells.push(DigitCell {
                    digit: digit as u8,
                    position,
                    count: *count,
                    percentage: percentage(*count, self.distinct),
                });
            }
        }
        cells
    }
}

/// Left-pads to 19 digits; `None` for non-digits or longer values.
pub fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.len() > POSITIONS
        || !trimmed.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    Some(format!("{trimmed:0>width$}", width = POSITIONS))
}

fn percentage(count: u64, distinct: usize) -> f64 {
    if distinct == 0 {
        return 0.0;
    }
    let raw = count as f64 / distinct as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
