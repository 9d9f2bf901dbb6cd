//! Trade tick series from `tag60_unix_nanoseconds` / `tag270` exports.

use std::collections::HashSet;

use serde::Serialize;

use crate::batch::Batch;
use crate::table::TabularRow;
use crate::{CoreError, FieldError, Tick, TimestampError, UtcDateTime};

pub const TIMESTAMP_COLUMN: &str = "tag60_unix_nanoseconds";
pub const PRICE_COLUMN: &str = "tag270";

/// Ticks in time order with the observed price range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSeries {
    pub ticks: Vec<Tick>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl TickSeries {
    /// Sorts by time and keeps the first tick seen for each timestamp.
    pub fn new(ticks: Vec<Tick>) -> Self {
        let mut seen = HashSet::with_capacity(ticks.len());
        let mut ticks: Vec<Tick> = ticks
            .into_iter()
            .filter(|tick| seen.insert(tick.timestamp))
            .collect();
        ticks.sort_by_key(|tick| tick.timestamp);

        let min_price = ticks.iter().map(|tick| tick.price).reduce(f64::min);
        let max_price = ticks.iter().map(|tick| tick.price).reduce(f64::max);
        Self {
            ticks,
            min_price,
            max_price,
        }
    }

    pub fn from_rows(rows: &[TabularRow]) -> Batch<Self> {
        let mut batch = Batch::new();
        for row in rows {
            match read_tick(row) {
                Ok(tick) => batch.push(tick),
                Err(error) => batch.skip(row.line(), error),
            }
        }
        let before = batch.len();
        let batch = batch.map_items(|ticks| vec![Self::new(ticks)]);
        if let Some(series) = batch.items.first() {
            let duplicates = before - series.ticks.len();
            if duplicates > 0 {
                tracing::debug!(duplicates, "dropped ticks with repeated timestamps");
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

pub fn read_tick(row: &TabularRow) -> Result<Tick, CoreError> {
    let timestamp = read_unix_nanos(row, TIMESTAMP_COLUMN)?;
    let price = row.non_negative(PRICE_COLUMN)?;
    Ok(Tick::new(timestamp, price)?)
}

/// Integer nanoseconds since the Unix epoch.
pub fn read_unix_nanos(row: &TabularRow, column: &str) -> Result<UtcDateTime, CoreError> {
    let raw = row.text(column)?;
    let nanos = raw.parse::<i128>().map_err(|_| FieldError::Malformed {
        column: column.to_owned(),
        value: raw.to_owned(),
    })?;
    UtcDateTime::from_unix_nanos(nanos).map_err(|_| {
        CoreError::Timestamp(TimestampError::OutOfRange {
            value: raw.to_owned(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: u64, nanos: &str, price: &str) -> TabularRow {
        TabularRow::from_pairs(line, [(TIMESTAMP_COLUMN, nanos), (PRICE_COLUMN, price)])
    }

    #[test]
    fn sorts_and_deduplicates_by_timestamp() {
        let rows = vec![
            row(2, "1577370615300000000", "3212.50"),
            row(3, "1577370615100000000", "3212.25"),
            row(4, "1577370615300000000", "3299.00"),
            row(5, "1577370615200000000", "3213.00"),
        ];

        let batch = TickSeries::from_rows(&rows);
        let series = &batch.items[0];
        let prices: Vec<f64> = series.ticks.iter().map(|tick| tick.price).collect();
        assert_eq!(prices, vec![3212.25, 3213.0, 3212.5]);
        assert_eq!(series.min_price, Some(3212.25));
        assert_eq!(series.max_price, Some(3213.0));
        assert!(batch.skipped.is_empty());
    }

    #[test]
    fn skips_malformed_rows() {
        let rows = vec![
            row(2, "1577370615100000000", "3212.25"),
            row(3, "yesterday", "3212.25"),
            row(4, "1577370615200000000", "-1"),
            TabularRow::from_pairs(5, [(TIMESTAMP_COLUMN, "1577370615300000000")]),
        ];

        let batch = TickSeries::from_rows(&rows);
        assert_eq!(batch.items[0].len(), 1);
        let lines: Vec<u64> = batch.skipped.iter().map(|row| row.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn reads_epoch_nanoseconds_exactly() {
        let parsed = read_unix_nanos(&row(2, "1577370615123456789", "1"), TIMESTAMP_COLUMN)
            .expect("must parse");
        assert_eq!(parsed.unix_nanos(), 1_577_370_615_123_456_789);
    }

    #[test]
    fn empty_input_has_no_price_range() {
        let series = TickSeries::new(Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.min_price, None);
    }
}
