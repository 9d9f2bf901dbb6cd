//! Old/new order book aggregation.
//!
//! Split-book exports carry two books per row (`old_*` and `new_*`
//! columns). Both are reshaped with the same rules as a single book and then
//! merged price by price.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::batch::Batch;
use crate::reshape::RowReshaper;
use crate::schema::{BookSchema, SchemaError};
use crate::table::TabularRow;
use crate::{mid_price, AggregatedLevel, BookSnapshot, PriceLevel, SplitBook, TimestampError};

/// Merges two books. Bids come out price-descending, asks ascending.
///
/// Every price seen on either side appears exactly once; a price missing
/// from one book contributes zero volume from it. The timestamp is the new
/// book's.
pub fn aggregate(old: &BookSnapshot, new: &BookSnapshot) -> SplitBook {
    let bids = merge_side(&old.bids, &new.bids, true);
    let asks = merge_side(&old.asks, &new.asks, false);
    let mid_price = mid_price(
        bids.first().map(|level| level.price),
        asks.first().map(|level| level.price),
    );

    SplitBook {
        timestamp: new.timestamp,
        mid_price,
        bids,
        asks,
    }
}

fn merge_side(old: &[PriceLevel], new: &[PriceLevel], descending: bool) -> Vec<AggregatedLevel> {
    // (new, old) volume per price; first occurrence of a price wins per book
    let mut volumes: BTreeMap<OrderedFloat<f64>, (Option<f64>, Option<f64>)> = BTreeMap::new();

    for level in new {
        let slot = volumes.entry(OrderedFloat(level.price)).or_default();
        if slot.0.is_none() {
            slot.0 = Some(level.volume);
        }
    }
    for level in old {
        let slot = volumes.entry(OrderedFloat(level.price)).or_default();
        if slot.1.is_none() {
            slot.1 = Some(level.volume);
        }
    }

    let merged = volumes.into_iter().map(|(price, (new_volume, old_volume))| {
        AggregatedLevel::new(
            price.into_inner(),
            new_volume.unwrap_or(0.0),
            old_volume.unwrap_or(0.0),
        )
    });

    if descending {
        merged.rev().collect()
    } else {
        merged.collect()
    }
}

/// Reshapes rows holding both an `old_` and a `new_` book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReshaper {
    old: RowReshaper,
    new: RowReshaper,
}

impl SplitReshaper {
    pub fn new(levels: usize, headers: &[String]) -> Result<Self, SchemaError> {
        let (old, new) = BookSchema::split_pair(levels)?;
        Ok(Self {
            old: RowReshaper::new(&old, headers)?,
            new: RowReshaper::new(&new, headers)?,
        })
    }

    pub fn reshape(&self, row: &TabularRow) -> Result<SplitBook, TimestampError> {
        let old = self.old.reshape(row)?;
        let new = self.new.reshape(row)?;
        Ok(aggregate(&old, &new))
    }

    pub fn reshape_all(&self, rows: &[TabularRow]) -> Batch<SplitBook> {
        let mut batch = Batch::new();
        for row in rows {
            match self.reshape(row) {
                Ok(book) => batch.push(book),
                Err(error) => batch.skip(row.line(), error),
            }
        }
        batch
    }
}
