//! Row reshaping: one export row into one [`BookSnapshot`].

use crate::batch::Batch;
use crate::schema::{BookLayout, BookSchema, LevelColumns, SchemaError};
use crate::table::TabularRow;
use crate::{BookSnapshot, FieldError, PriceLevel, Side, TimestampError, UtcDateTime};

/// Reshapes rows of one file against a header-validated layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReshaper {
    layout: BookLayout,
}

impl RowReshaper {
    pub fn new(schema: &BookSchema, headers: &[String]) -> Result<Self, SchemaError> {
        Ok(Self::from_layout(schema.resolve(headers)?))
    }

    pub fn from_layout(layout: BookLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &BookLayout {
        &self.layout
    }

    /// Fails only when the row has no usable timestamp. Bad level cells
    /// shorten the book instead.
    pub fn reshape(&self, row: &TabularRow) -> Result<BookSnapshot, TimestampError> {
        let timestamp = read_timestamp(row, &self.layout.timestamp_columns)?;
        let bids = read_levels(row, self.layout.side(Side::Bid));
        let asks = read_levels(row, self.layout.side(Side::Ask));
        Ok(BookSnapshot::new(timestamp, bids, asks))
    }

    pub fn reshape_all(&self, rows: &[TabularRow]) -> Batch<BookSnapshot> {
        let mut batch = Batch::new();
        for row in rows {
            match self.reshape(row) {
                Ok(snapshot) => batch.push(snapshot),
                Err(error) => batch.skip(row.line(), error),
            }
        }
        batch
    }
}

/// Timestamp from the first present candidate column.
pub fn read_timestamp(
    row: &TabularRow,
    candidates: &[String],
) -> Result<UtcDateTime, TimestampError> {
    let (_, raw) = row.first_of(candidates).ok_or(TimestampError::Empty)?;
    UtcDateTime::parse_flexible(raw)
}

pub fn read_level(row: &TabularRow, columns: &LevelColumns) -> Result<PriceLevel, FieldError> {
    let price = row.non_negative(&columns.price)?;
    let volume = row.non_negative(&columns.quantity)?;
    Ok(PriceLevel { price, volume })
}

/// Levels in column order, stopping at the first level that cannot be read.
///
/// Deeper levels are never used once one is dropped, even if their cells
/// are filled.
pub fn read_levels(row: &TabularRow, columns: &[LevelColumns]) -> Vec<PriceLevel> {
    let mut levels = Vec::with_capacity(columns.len());
    for level_columns in columns {
        match read_level(row, level_columns) {
            Ok(level) => levels.push(level),
            Err(error) if error.is_missing() => {
                tracing::debug!(
                    line = row.line(),
                    side = level_columns.side.as_str(),
                    level = level_columns.level,
                    column = error.column(),
                    "book ends before configured depth"
                );
                break;
            }
            Err(error) => {
                tracing::warn!(
                    line = row.line(),
                    side = level_columns.side.as_str(),
                    level = level_columns.level,
                    column = error.column(),
                    error = %error,
                    "dropping level and everything deeper"
                );
                break;
            }
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(levels: usize) -> Vec<String> {
        let mut columns = vec![String::from("timestamp")];
        for side in ["bid", "ask"] {
            for level in 1..=levels {
                columns.push(format!("{side}_{level:02}_price"));
                columns.push(format!("{side}_{level:02}_qty"));
            }
        }
        columns
    }

    fn reshaper() -> RowReshaper {
        RowReshaper::new(&BookSchema::default(), &headers(11)).expect("layout")
    }

    fn full_row() -> TabularRow {
        let mut row = TabularRow::new(2);
        row.insert("timestamp", "2023-03-24T10:45:32");
        for level in 1..=11 {
            let step = level as f64 * 0.25;
            row.insert(format!("bid_{level:02}_price"), format!("{}", 384.25 - step));
            row.insert(format!("bid_{level:02}_qty"), "20");
            row.insert(format!("ask_{level:02}_price"), format!("{}", 384.25 + step));
            row.insert(format!("ask_{level:02}_qty"), "30");
        }
        row
    }

    #[test]
    fn reshapes_full_book() {
        let snapshot = reshaper().reshape(&full_row()).expect("must reshape");
        assert_eq!(snapshot.bids.len(), 11);
        assert_eq!(snapshot.asks.len(), 11);
        assert_eq!(snapshot.bids[0].price, 384.0);
        assert_eq!(snapshot.asks[0].price, 384.5);
        assert_eq!(snapshot.mid_price, Some(384.25));
        assert_eq!(snapshot.timestamp.format_rfc3339(), "2023-03-24T10:45:32Z");
    }

    #[test]
    fn gap_drops_every_deeper_level() {
        let mut row = TabularRow::new(3);
        row.insert("timestamp", "2023-03-24T10:45:32");
        for level in (1..=11).filter(|level| *level != 5) {
            row.insert(format!("bid_{level:02}_price"), format!("{}", 100 - level));
            row.insert(format!("bid_{level:02}_qty"), "10");
        }

        let snapshot = reshaper().reshape(&row).expect("must reshape");
        assert_eq!(snapshot.bids.len(), 4);
        assert_eq!(snapshot.bids[3].price, 96.0);
        assert!(snapshot.asks.is_empty());
        assert_eq!(snapshot.mid_price, None);
    }

    #[test]
    fn malformed_cell_fails_closed() {
        let mut row = full_row();
        row.insert("ask_03_price", "n/a");

        let snapshot = reshaper().reshape(&row).expect("must reshape");
        assert_eq!(snapshot.asks.len(), 2);
        assert_eq!(snapshot.bids.len(), 11);
    }

    #[test]
    fn negative_quantity_fails_closed() {
        let mut row = full_row();
        row.insert("bid_01_qty", "-4");

        let snapshot = reshaper().reshape(&row).expect("must reshape");
        assert!(snapshot.bids.is_empty());
        assert_eq!(snapshot.mid_price, None);
    }

    #[test]
    fn row_without_timestamp_is_rejected() {
        let row = TabularRow::from_pairs(7, [("bid_01_price", "1"), ("bid_01_qty", "1")]);
        let err = reshaper().reshape(&row).expect_err("must fail");
        assert_eq!(err, TimestampError::Empty);

        let batch = reshaper().reshape_all(&[row, full_row()]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].line, 7);
    }

    #[test]
    fn reshaping_is_idempotent() {
        let reshaper = reshaper();
        let row = full_row();
        assert_eq!(
            reshaper.reshape(&row).expect("first"),
            reshaper.reshape(&row).expect("second")
        );
    }
}
