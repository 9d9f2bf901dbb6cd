//! Daily OHLC bars from settlement exports.

use crate::batch::Batch;
use crate::table::TabularRow;
use crate::{CoreError, OhlcBar};

pub const DATE_COLUMN: &str = "date";
pub const OPEN_COLUMN: &str = "open";
pub const HIGH_COLUMN: &str = "high_trade";
pub const LOW_COLUMN: &str = "low_trade";
pub const CLOSE_COLUMN: &str = "settlement";

pub fn read_bar(row: &TabularRow) -> Result<OhlcBar, CoreError> {
    let date = row.text(DATE_COLUMN)?;
    let open = row.number(OPEN_COLUMN)?;
    let high = row.number(HIGH_COLUMN)?;
    let low = row.number(LOW_COLUMN)?;
    let close = row.number(CLOSE_COLUMN)?;
    Ok(OhlcBar::new(date, open, high, low, close)?)
}

/// Bars in file order; rows that fail validation are skipped.
pub fn read_bars(rows: &[TabularRow]) -> Batch<OhlcBar> {
    let mut batch = Batch::new();
    for row in rows {
        match read_bar(row) {
            Ok(bar) => batch.push(bar),
            Err(error) => batch.skip(row.line(), error),
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    fn row(line: u64, date: &str, values: [&str; 4]) -> TabularRow {
        TabularRow::from_pairs(
            line,
            [
                (DATE_COLUMN, date),
                (OPEN_COLUMN, values[0]),
                (HIGH_COLUMN, values[1]),
                (LOW_COLUMN, values[2]),
                (CLOSE_COLUMN, values[3]),
            ],
        )
    }

    #[test]
    fn keeps_file_order_and_uses_settlement_as_close() {
        let rows = vec![
            row(2, "2019-12-27", ["3240.0", "3247.5", "3234.25", "3241.0"]),
            row(3, "2019-12-26", ["3227.0", "3240.0", "3226.0", "3239.75"]),
        ];

        let batch = read_bars(&rows);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.items[0].date, "2019-12-27");
        assert_eq!(batch.items[0].close, 3241.0);
        assert_eq!(batch.items[1].high, 3240.0);
    }

    #[test]
    fn skips_inverted_and_incomplete_bars() {
        let rows = vec![
            row(2, "2019-12-27", ["3240.0", "3230.0", "3234.25", "3241.0"]),
            row(3, "2019-12-26", ["3227.0", "", "3226.0", "3239.75"]),
            row(4, "2019-12-24", ["3225.0", "3226.0", "3220.0", "3224.5"]),
        ];

        let batch = read_bars(&rows);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.skipped.len(), 2);
        assert_eq!(batch.skipped[0].line, 2);
        assert_eq!(
            batch.skipped[0].reason,
            ValidationError::InvalidBarRange.to_string()
        );
    }
}
