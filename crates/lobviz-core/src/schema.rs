//! Column naming for level-based order book exports.
//!
//! A [`BookSchema`] describes the `{prefix}{side}_{level:02}_{price|qty}`
//! template. [`BookSchema::resolve`] checks it against a header once per
//! file and yields a [`BookLayout`] holding the concrete column names, so
//! row reshaping never guesses at keys.

use serde::Serialize;
use thiserror::Error;

use crate::Side;

pub const DEFAULT_LEVELS: usize = 11;
pub const MAX_LEVELS: usize = 99;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("required column '{column}' is missing from the header")]
    MissingColumn { column: String },
    #[error("no timestamp column found, expected one of: {candidates}")]
    NoTimestampColumn { candidates: String },
    #[error("level count {levels} must be between 1 and {max}")]
    InvalidDepth { levels: usize, max: usize },
}

/// Role of a column within one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelField {
    Price,
    Quantity,
}

impl LevelField {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Quantity => "qty",
        }
    }
}

/// Concrete column names of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelColumns {
    pub side: Side,
    pub level: usize,
    pub price: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSchema {
    prefix: String,
    levels: usize,
    timestamp_columns: Vec<String>,
}

impl Default for BookSchema {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            levels: DEFAULT_LEVELS,
            timestamp_columns: vec![String::from("timestamp")],
        }
    }
}

impl BookSchema {
    pub fn new(levels: usize) -> Result<Self, SchemaError> {
        if levels == 0 || levels > MAX_LEVELS {
            return Err(SchemaError::InvalidDepth {
                levels,
                max: MAX_LEVELS,
            });
        }

        Ok(Self {
            levels,
            ..Self::default()
        })
    }

    /// Old/new pair used by split-book exports (`old_bid_01_price`, ...).
    pub fn split_pair(levels: usize) -> Result<(Self, Self), SchemaError> {
        let timestamps = vec![
            String::from("new_tag60_unix_nanoseconds"),
            String::from("tag60"),
            String::from("timestamp"),
        ];
        let old = Self::new(levels)?
            .with_prefix("old_")
            .with_timestamp_columns(timestamps.clone());
        let new = Self::new(levels)?
            .with_prefix("new_")
            .with_timestamp_columns(timestamps);
        Ok((old, new))
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Candidates in priority order; the first non-empty one wins per row.
    pub fn with_timestamp_columns(mut self, columns: Vec<String>) -> Self {
        self.timestamp_columns = columns;
        self
    }

    pub const fn levels(&self) -> usize {
        self.levels
    }

    pub fn column(&self, side: Side, level: usize, field: LevelField) -> String {
        format!(
            "{}{}_{:02}_{}",
            self.prefix,
            side.as_str(),
            level,
            field.suffix()
        )
    }

    pub fn level_columns(&self, side: Side, level: usize) -> LevelColumns {
        LevelColumns {
            side,
            level,
            price: self.column(side, level, LevelField::Price),
            quantity: self.column(side, level, LevelField::Quantity),
        }
    }

    /// Checks the header and fixes the usable depth per side.
    ///
    /// Level 01 of both sides and one timestamp column are required. Deeper
    /// levels are used up to the first level whose columns are not in the
    /// header.
    pub fn resolve(&self, headers: &[String]) -> Result<BookLayout, SchemaError> {
        let has = |column: &str| headers.iter().any(|header| header == column);

        let timestamp_columns: Vec<String> = self
            .timestamp_columns
            .iter()
            .filter(|column| has(column))
            .cloned()
            .collect();
        if timestamp_columns.is_empty() {
            return Err(SchemaError::NoTimestampColumn {
                candidates: self.timestamp_columns.join(", "),
            });
        }

        let mut sides = Vec::with_capacity(Side::BOTH.len());
        for side in Side::BOTH {
            let mut levels = Vec::with_capacity(self.levels);
            for level in 1..=self.levels {
                let columns = self.level_columns(side, level);
                let present = has(&columns.price) && has(&columns.quantity);
                if !present {
                    if level == 1 {
                        let column = if has(&columns.price) {
                            columns.quantity
                        } else {
                            columns.price
                        };
                        return Err(SchemaError::MissingColumn { column });
                    }
                    break;
                }
                levels.push(columns);
            }
            if levels.len() < self.levels {
                tracing::debug!(
                    side = side.as_str(),
                    prefix = %self.prefix,
                    requested = self.levels,
                    available = levels.len(),
                    "header carries fewer levels than requested"
                );
            }
            sides.push(levels);
        }

        let asks = sides.pop().unwrap_or_default();
        let bids = sides.pop().unwrap_or_default();
        Ok(BookLayout {
            timestamp_columns,
            bids,
            asks,
        })
    }
}

/// Header-validated column layout of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookLayout {
    pub timestamp_columns: Vec<String>,
    pub bids: Vec<LevelColumns>,
    pub asks: Vec<LevelColumns>,
}

impl BookLayout {
    pub fn side(&self, side: Side) -> &[LevelColumns] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }
}
