//! Price x time quantity heatmap.
//!
//! Both axes are partitioned into half-open bins `[min, max)`. Prices start
//! at the bin step multiple at or below the lowest price; time starts at the
//! earliest trade. Bins extend until the one containing the maximum, so the
//! highest price and the latest trade are always inside the grid.
//!
//! | Output | Meaning |
//! |---|---|
//! | `price_bins` | every price bin, lowest first |
//! | `time_bins` | every time bin, earliest first |
//! | `cells` | only the (price, time) pairs that hold at least one trade |

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::batch::Batch;
use crate::table::TabularRow;
use crate::ticks::read_unix_nanos;
use crate::{CoreError, UtcDateTime, ValidationError};

pub const TIMESTAMP_COLUMN: &str = "tag60_unix_nanoseconds";
pub const PRICE_COLUMN: &str = "tag270";
pub const QUANTITY_COLUMN: &str = "tag32";

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Longest accepted time bin, in nanoseconds.
const MAX_INTERVAL_NANOS: f64 = i64::MAX as f64;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BinningError {
    #[error("price bin size must be a positive finite number, got {value}")]
    InvalidBinSize { value: f64 },
    #[error("time interval must be positive seconds within the clock range, got {value}")]
    InvalidInterval { value: f64 },
    #[error("no points to bin")]
    NoPoints,
    #[error("time bin edge falls outside the representable range")]
    TimeOutOfRange,
    #[error("price range needs more than {max} bins at this bin size")]
    TooManyBins { max: usize },
}

/// Upper bound on bins per axis.
pub const MAX_BINS: usize = 100_000;

/// One trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradePoint {
    pub timestamp: UtcDateTime,
    pub price: f64,
    pub quantity: f64,
}

impl TradePoint {
    pub fn new(timestamp: UtcDateTime, price: f64, quantity: f64) -> Result<Self, ValidationError> {
        for (field, value) in [("price", price), ("quantity", quantity)] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeValue { field });
            }
        }
        Ok(Self {
            timestamp,
            price,
            quantity,
        })
    }

    pub fn from_row(row: &TabularRow) -> Result<Self, CoreError> {
        let timestamp = read_unix_nanos(row, TIMESTAMP_COLUMN)?;
        let price = row.non_negative(PRICE_COLUMN)?;
        let quantity = row.non_negative(QUANTITY_COLUMN)?;
        Ok(Self::new(timestamp, price, quantity)?)
    }

    pub fn from_rows(rows: &[TabularRow]) -> Batch<Self> {
        let mut batch = Batch::new();
        for row in rows {
            match Self::from_row(row) {
                Ok(point) => batch.push(point),
                Err(error) => batch.skip(row.line(), error),
            }
        }
        batch
    }
}

/// Bin sizes for both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapConfig {
    pub bin_size: f64,
    pub interval_secs: f64,
}

impl HeatmapConfig {
    pub fn new(bin_size: f64, interval_secs: f64) -> Result<Self, BinningError> {
        if !bin_size.is_finite() || bin_size <= 0.0 {
            return Err(BinningError::InvalidBinSize { value: bin_size });
        }
        if !interval_secs.is_finite() || interval_secs <= 0.0 {
            return Err(BinningError::InvalidInterval {
                value: interval_secs,
            });
        }
        let nanos = interval_secs * NANOS_PER_SECOND;
        if nanos.round() < 1.0 || nanos > MAX_INTERVAL_NANOS {
            return Err(BinningError::InvalidInterval {
                value: interval_secs,
            });
        }
        Ok(Self {
            bin_size,
            interval_secs,
        })
    }

    fn interval_nanos(&self) -> i128 {
        interval_nanos(self.interval_secs)
    }
}

fn interval_nanos(interval_secs: f64) -> i128 {
    (interval_secs * NANOS_PER_SECOND).round() as i128
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBin {
    pub index: usize,
    pub min: f64,
    pub max: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBin {
    pub index: usize,
    pub start: UtcDateTime,
    pub end: UtcDateTime,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub price_bin: usize,
    pub time_bin: usize,
    pub count: u64,
    pub total_quantity: f64,
    pub mean_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTimeHeatmap {
    pub price_bins: Vec<PriceBin>,
    pub time_bins: Vec<TimeBin>,
    pub cells: Vec<HeatmapCell>,
    /// Largest `total_quantity` over all cells, for the color scale.
    pub max_quantity: f64,
}

impl PriceTimeHeatmap {
    pub fn build(config: HeatmapConfig, points: &[TradePoint]) -> Result<Self, BinningError> {
        // Fields are public, so a literal can skip `HeatmapConfig::new`.
        let config = HeatmapConfig::new(config.bin_size, config.interval_secs)?;
        if points.is_empty() {
            return Err(BinningError::NoPoints);
        }

        let mut ordered = points.to_vec();
        ordered.sort_by_key(|point| point.timestamp);

        let price_axis = PriceAxis::new(config.bin_size, &ordered)?;
        let time_axis = TimeAxis::new(config.interval_nanos(), &ordered)?;

        let mut cells: BTreeMap<(usize, usize), CellTotals> = BTreeMap::new();
        for point in &ordered {
            let key = (
                price_axis.index_of(point.price),
                time_axis.index_of(point.timestamp),
            );
            cells.entry(key).or_default().add(point);
        }

        let cells: Vec<HeatmapCell> = cells
            .into_iter()
            .map(|((price_bin, time_bin), totals)| HeatmapCell {
                price_bin,
                time_bin,
                count: totals.count,
                total_quantity: totals.quantity,
                mean_price: totals.price_sum / totals.count as f64,
            })
            .collect();
        let max_quantity = cells
            .iter()
            .map(|cell| cell.total_quantity)
            .fold(0.0, f64::max);

        tracing::debug!(
            points = ordered.len(),
            price_bins = price_axis.count,
            time_bins = time_axis.count,
            cells = cells.len(),
            "built heatmap"
        );

        Ok(Self {
            price_bins: price_axis.bins(),
            time_bins: time_axis.bins()?,
            cells,
            max_quantity,
        })
    }

    pub fn cell(&self, price_bin: usize, time_bin: usize) -> Option<&HeatmapCell> {
        self.cells
            .iter()
            .find(|cell| cell.price_bin == price_bin && cell.time_bin == time_bin)
    }
}

#[derive(Debug, Default)]
struct CellTotals {
    count: u64,
    quantity: f64,
    price_sum: f64,
}

impl CellTotals {
    fn add(&mut self, point: &TradePoint) {
        self.count += 1;
        self.quantity += point.quantity;
        self.price_sum += point.price;
    }
}

struct PriceAxis {
    start: f64,
    step: f64,
    count: usize,
}

impl PriceAxis {
    fn new(step: f64, points: &[TradePoint]) -> Result<Self, BinningError> {
        let min = points.iter().map(|point| point.price).fold(f64::INFINITY, f64::min);
        let max = points
            .iter()
            .map(|point| point.price)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut start = (min / step).floor() * step;
        if start > min {
            start -= step;
        }

        let span = ((max - start) / step).floor();
        if !span.is_finite() || span >= MAX_BINS as f64 {
            return Err(BinningError::TooManyBins { max: MAX_BINS });
        }
        let mut axis = Self {
            start,
            step,
            count: span as usize + 1,
        };
        // A step below the spacing of floats near `start` never advances the edges.
        if axis.edge(1) <= axis.edge(0) {
            return Err(BinningError::TooManyBins { max: MAX_BINS });
        }
        while max >= axis.edge(axis.count) {
            if axis.count >= MAX_BINS {
                return Err(BinningError::TooManyBins { max: MAX_BINS });
            }
            axis.count += 1;
        }
        Ok(axis)
    }

    fn edge(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }

    /// Index of the bin with `edge(i) <= price < edge(i + 1)`.
    fn index_of(&self, price: f64) -> usize {
        let estimate = ((price - self.start) / self.step).floor();
        let mut index = if estimate <= 0.0 {
            0
        } else {
            (estimate as usize).min(self.count - 1)
        };
        while index > 0 && price < self.edge(index) {
            index -= 1;
        }
        while index + 1 < self.count && price >= self.edge(index + 1) {
            index += 1;
        }
        index
    }

    fn bins(&self) -> Vec<PriceBin> {
        (0..self.count)
            .map(|index| {
                let min = self.edge(index);
                let max = self.edge(index + 1);
                PriceBin {
                    index,
                    min,
                    max,
                    label: format!("{min:.2}-{max:.2}"),
                }
            })
            .collect()
    }
}

struct TimeAxis {
    start: i128,
    step: i128,
    count: usize,
}

impl TimeAxis {
    fn new(step: i128, ordered: &[TradePoint]) -> Result<Self, BinningError> {
        let (first, last) = match (ordered.first(), ordered.last()) {
            (Some(first), Some(last)) => {
                (first.timestamp.unix_nanos(), last.timestamp.unix_nanos())
            }
            _ => return Err(BinningError::NoPoints),
        };

        let span = (last - first) / step;
        let count = usize::try_from(span)
            .ok()
            .filter(|span| *span < MAX_BINS)
            .ok_or(BinningError::TooManyBins { max: MAX_BINS })?;
        Ok(Self {
            start: first,
            step,
            count: count + 1,
        })
    }

    fn index_of(&self, timestamp: UtcDateTime) -> usize {
        let offset = (timestamp.unix_nanos() - self.start) / self.step;
        usize::try_from(offset).unwrap_or(0).min(self.count - 1)
    }

    fn edge(&self, index: usize) -> Result<UtcDateTime, BinningError> {
        let nanos = self
            .step
            .checked_mul(index as i128)
            .and_then(|offset| offset.checked_add(self.start))
            .ok_or(BinningError::TimeOutOfRange)?;
        UtcDateTime::from_unix_nanos(nanos).map_err(|_| BinningError::TimeOutOfRange)
    }

    fn bins(&self) -> Result<Vec<TimeBin>, BinningError> {
        (0..self.count)
            .map(|index| {
                let start = self.edge(index)?;
                let end = self.edge(index + 1)?;
                Ok(TimeBin {
                    index,
                    start,
                    end,
                    label: format!("{}-{}", start.format_clock(), end.format_clock()),
                })
            })
            .collect()
    }
}
