use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// Book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub const BOTH: [Self; 2] = [Self::Bid, Self::Ask];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bid => "bid",
            Self::Ask => "ask",
        }
    }
}

/// One resting book level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub volume: f64,
}

impl PriceLevel {
    pub fn new(price: f64, volume: f64) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_non_negative("volume", volume)?;
        Ok(Self { price, volume })
    }
}

/// Order book state reshaped from a single export row.
///
/// `bids` and `asks` keep column order, level 01 first. `mid_price` is only
/// present when both sides have a best level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub timestamp: UtcDateTime,
    pub mid_price: Option<f64>,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl BookSnapshot {
    pub fn new(timestamp: UtcDateTime, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        let mid_price = mid_price(
            bids.first().map(|level| level.price),
            asks.first().map(|level| level.price),
        );
        Self {
            timestamp,
            mid_price,
            bids,
            asks,
        }
    }

    pub fn levels(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    pub fn spread(&self) -> Option<f64> {
        match (self.bids.first(), self.asks.first()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }
}

/// Volume resting at one price across an old and a new book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedLevel {
    pub price: f64,
    pub new_volume: f64,
    pub old_volume: f64,
    pub total_volume: f64,
}

impl AggregatedLevel {
    pub fn new(price: f64, new_volume: f64, old_volume: f64) -> Self {
        Self {
            price,
            new_volume,
            old_volume,
            total_volume: new_volume + old_volume,
        }
    }
}

/// Old/new order book merged price by price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitBook {
    pub timestamp: UtcDateTime,
    pub mid_price: Option<f64>,
    pub bids: Vec<AggregatedLevel>,
    pub asks: Vec<AggregatedLevel>,
}

/// One traded price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: UtcDateTime,
    pub price: f64,
}

impl Tick {
    pub fn new(timestamp: UtcDateTime, price: f64) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        Ok(Self { timestamp, price })
    }
}

/// Daily OHLC bar. `date` is kept as the export's label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcBar {
    /// Settlement prices can sit outside the traded range, so open/close are
    /// not bounded by high/low.
    pub fn new(
        date: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        Ok(Self {
            date: date.into(),
            open,
            high,
            low,
            close,
        })
    }
}

/// Average of best bid and best ask; `None` unless both exist.
pub fn mid_price(best_bid: Option<f64>, best_ask: Option<f64>) -> Option<f64> {
    match (best_bid, best_ask) {
        (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
        _ => None,
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
