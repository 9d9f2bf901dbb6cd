//! CLI argument definitions for lobviz.
//!
//! Each command loads one CSV export, runs one transform and prints the
//! result inside a `{ meta, data, errors }` envelope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `book` | Reshape level columns into order book snapshots |
//! | `split` | Merge old/new books price by price |
//! | `digits` | Timestamp digit frequency by position |
//! | `heatmap` | Price x time quantity heatmap |
//! | `ticks` | Trade tick series |
//! | `ohlc` | Daily OHLC bars |
//! | `pivot` | Pivot per-category results into series |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--log-level` | `warn` | Log filter for stderr (`LOBVIZ_LOG`) |
//!
//! # Examples
//!
//! ```bash
//! # Replay frame 3 of a 5-level book
//! lobviz book lob.csv --levels 5 --frame 3 --pretty
//!
//! # One-dollar, one-minute heatmap
//! lobviz heatmap trades.csv --bin-size 1 --interval-secs 60
//!
//! # Series per strategy
//! lobviz pivot results.csv --category Strategy --x Spread --value Profit=profit
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lobviz_core::schema::DEFAULT_LEVELS;

/// lobviz - chart-ready transforms for market-data CSV exports
#[derive(Debug, Parser)]
#[command(
    name = "lobviz",
    author,
    version,
    about = "Chart-ready transforms for market-data CSV exports",
    long_about = "lobviz reads order book, trade and result exports and emits the \
structures a chart layer draws:\n\
\n\
  • Order book snapshots and old/new split books\n\
  • Timestamp digit frequency and price x time heatmaps\n\
  • Tick, OHLC and pivoted result series\n\
\n\
Use 'lobviz <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - json: Single JSON object (default)
    /// - ndjson: One JSON object per line
    /// - table: Human-readable summary
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Log filter for diagnostics written to stderr (e.g. `debug`,
    /// `lobviz_core=trace`).
    #[arg(long, global = true, env = "LOBVIZ_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reshape `bid_NN_price`/`ask_NN_qty` columns into book snapshots.
    ///
    /// # Examples
    ///
    ///   lobviz book lob.csv
    ///   lobviz book lob.csv --levels 5 --frame 10
    ///   lobviz book lob.csv --advance 3
    Book(BookArgs),

    /// Merge `old_`/`new_` prefixed books into one book per row.
    ///
    /// # Examples
    ///
    ///   lobviz split split_book.csv --levels 11
    Split(SplitArgs),

    /// Count digits by position over distinct nanosecond timestamps.
    ///
    /// # Examples
    ///
    ///   lobviz digits trades.csv
    ///   lobviz digits lob.csv --column new_tag60_unix_nanoseconds
    Digits(DigitsArgs),

    /// Bin trades into a price x time quantity grid.
    ///
    /// # Examples
    ///
    ///   lobviz heatmap trades.csv --bin-size 0.25 --interval-secs 60
    Heatmap(HeatmapArgs),

    /// Trade prices in time order.
    Ticks(InputArgs),

    /// Daily OHLC bars from settlement exports.
    Ohlc(InputArgs),

    /// Pivot long-format result rows into one series per category.
    ///
    /// # Examples
    ///
    ///   lobviz pivot results.csv --category Strategy --x Spread \
    ///       --value "Total Profit=profit" --value Inventory=inventory
    Pivot(PivotArgs),
}

/// Arguments for commands that only take an input file.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// CSV file with a header row.
    pub input: PathBuf,
}

/// Arguments for the `book` command.
#[derive(Debug, Args)]
pub struct BookArgs {
    /// CSV file with a header row.
    pub input: PathBuf,

    /// Levels per side to read.
    #[arg(long, default_value_t = DEFAULT_LEVELS)]
    pub levels: usize,

    /// Frame to position the playback cursor on.
    #[arg(long)]
    pub frame: Option<usize>,

    /// Timer ticks to play from the cursor (wraps at the last frame).
    #[arg(long, default_value_t = 0)]
    pub advance: usize,
}

/// Arguments for the `split` command.
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// CSV file with a header row.
    pub input: PathBuf,

    /// Levels per side and book to read.
    #[arg(long, default_value_t = DEFAULT_LEVELS)]
    pub levels: usize,
}

/// Arguments for the `digits` command.
#[derive(Debug, Args)]
pub struct DigitsArgs {
    /// CSV file with a header row.
    pub input: PathBuf,

    /// Column holding the numeric timestamps.
    #[arg(long, default_value = "tag60_unix_nanoseconds")]
    pub column: String,
}

/// Arguments for the `heatmap` command.
#[derive(Debug, Args)]
pub struct HeatmapArgs {
    /// CSV file with `tag60_unix_nanoseconds`, `tag270` and `tag32` columns.
    pub input: PathBuf,

    /// Price bin width.
    #[arg(long)]
    pub bin_size: f64,

    /// Time bin width in seconds.
    #[arg(long)]
    pub interval_secs: f64,
}

/// Arguments for the `pivot` command.
#[derive(Debug, Args)]
pub struct PivotArgs {
    /// CSV file with a header row.
    pub input: PathBuf,

    /// Column naming the series category.
    #[arg(long)]
    pub category: String,

    /// Column holding the x value.
    #[arg(long)]
    pub x: String,

    /// Value column and its metric name, as `COLUMN=metric`. Repeatable.
    #[arg(long = "value", required = true, num_args = 1)]
    pub values: Vec<String>,
}
