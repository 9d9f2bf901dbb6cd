//! # Lobviz Core
//!
//! Chart-ready transforms for tabular market-data exports.
//!
//! ## Overview
//!
//! This crate turns flat CSV rows into the structures a chart layer draws:
//!
//! - **Order book snapshots** reshaped from `bid_01_price`-style columns
//! - **Split books** merging an old and a new book price by price
//! - **Digit frequency** of nanosecond timestamps by position
//! - **Price x time heatmaps** of traded quantity
//! - **Tick, OHLC and pivoted result series**
//! - **Playback state** for stepping through snapshot frames
//!
//! Every transform is a single synchronous pass over owned input.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Transform output with skipped-row bookkeeping |
//! | [`digits`] | Timestamp digit frequency matrix |
//! | [`domain`] | Domain models (BookSnapshot, SplitBook, Tick, OhlcBar) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`heatmap`] | Price x time quantity binning |
//! | [`ohlc`] | OHLC bars from settlement exports |
//! | [`pivot`] | Long-to-wide category pivot |
//! | [`playback`] | Frame cursor |
//! | [`reshape`] | Row to book snapshot |
//! | [`schema`] | Book column layout and header validation |
//! | [`split`] | Old/new book aggregation |
//! | [`table`] | CSV loading |
//! | [`ticks`] | Trade tick series |
//!
//! ## Quick Start
//!
//! ```rust
//! use lobviz_core::reshape::RowReshaper;
//! use lobviz_core::schema::BookSchema;
//! use lobviz_core::table::Table;
//!
//! let csv = "timestamp,bid_01_price,bid_01_qty,ask_01_price,ask_01_qty\n\
//!            2023-03-24T10:45:32,100,5,102,3\n";
//! let table = Table::from_reader(csv.as_bytes())?;
//! let reshaper = RowReshaper::new(&BookSchema::default(), table.headers())?;
//! let books = reshaper.reshape_all(table.rows());
//!
//! assert_eq!(books.items[0].mid_price, Some(101.0));
//! # Ok::<(), lobviz_core::CoreError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CSV file       │
//! └────────┬────────┘
//!          │ table::Table
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  BookSchema     │────▶│ RowReshaper      │──▶ BookSnapshot / SplitBook
//! └─────────────────┘     └──────────────────┘
//!          │
//!          ├──▶ DigitFrequency
//!          ├──▶ PriceTimeHeatmap
//!          └──▶ TickSeries / OhlcBar / PivotPoint
//!                          │
//!                          ▼
//!                 ┌──────────────────┐
//!                 │ Envelope<T>      │
//!                 └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! File and header problems fail the whole call. Problems inside a row only
//! cost that row (or that book level) and are reported through
//! [`batch::Batch::skipped`] and `tracing` diagnostics:
//!
//! ```rust
//! use lobviz_core::{CoreError, SchemaError};
//!
//! fn describe(error: &CoreError) -> &'static str {
//!     match error {
//!         CoreError::Table(_) => "input could not be read",
//!         CoreError::Schema(SchemaError::MissingColumn { .. }) => "header is incomplete",
//!         CoreError::Binning(_) => "binning parameters or data are unusable",
//!         _ => "other",
//!     }
//! }
//! # let _ = describe;
//! ```

pub mod batch;
pub mod digits;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod heatmap;
pub mod ohlc;
pub mod pivot;
pub mod playback;
pub mod reshape;
pub mod schema;
pub mod split;
pub mod table;
pub mod ticks;

// Re-export commonly used types at crate root for convenience

// Batch bookkeeping
pub use batch::{Batch, SkippedRow};

// Digit frequency
pub use digits::{DigitCell, DigitFrequency};

// Domain models
pub use domain::{
    mid_price, AggregatedLevel, BookSnapshot, OhlcBar, PriceLevel, Side, SplitBook, Tick,
    UtcDateTime,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};

// Error types
pub use error::{CoreError, FieldError, TimestampError, ValidationError};

// Heatmap
pub use heatmap::{
    BinningError, HeatmapCell, HeatmapConfig, PriceBin, PriceTimeHeatmap, TimeBin, TradePoint,
};

// Series
pub use pivot::{MetricColumn, PivotPoint, PivotSpec};
pub use playback::PlaybackState;
pub use ticks::TickSeries;

// Book reshaping
pub use reshape::RowReshaper;
pub use schema::{BookLayout, BookSchema, SchemaError};
pub use split::{aggregate, SplitReshaper};
pub use table::{Table, TableError, TabularRow};
