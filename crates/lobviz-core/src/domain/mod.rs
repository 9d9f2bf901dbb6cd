//! # Domain Models
//!
//! Chart-ready types produced by the lobviz transforms.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PriceLevel`] | One (price, volume) book level |
//! | [`BookSnapshot`] | Bid/ask levels of one row plus mid-price |
//! | [`AggregatedLevel`] | Old/new volume at one price |
//! | [`SplitBook`] | Old/new book merged by price |
//! | [`Tick`] | One traded price |
//! | [`OhlcBar`] | Daily open/high/low/close bar |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Levels validate on construction: prices and volumes are finite and
//! non-negative.
//!
//! ```rust
//! use lobviz_core::{BookSnapshot, PriceLevel, UtcDateTime};
//!
//! let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap();
//! let book = BookSnapshot::new(
//!     ts,
//!     vec![PriceLevel::new(100.0, 5.0).unwrap()],
//!     vec![PriceLevel::new(102.0, 3.0).unwrap()],
//! );
//! assert_eq!(book.mid_price, Some(101.0));
//! ```

mod models;
mod timestamp;

pub use models::{
    mid_price, AggregatedLevel, BookSnapshot, OhlcBar, PriceLevel, Side, SplitBook, Tick,
};
pub use timestamp::UtcDateTime;
