mod book;
mod digits;
mod heatmap;
mod ohlc;
mod pivot;
mod split;
mod ticks;

use std::path::Path;
use std::time::Instant;

use lobviz_core::{Envelope, EnvelopeError, SchemaError, SkippedRow, Table};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::{Metadata, RequestId};

/// Envelope error code for a run that produced no data.
pub const EMPTY_RESULT: &str = "empty_result";

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

impl CommandResult {
    pub fn ok(data: Value, rows_read: usize) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            rows_read,
            rows_skipped: 0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Counts skipped rows and adds one summary warning for them.
    pub fn with_skipped(mut self, skipped: &[SkippedRow]) -> Self {
        self.rows_skipped += skipped.len();
        if let Some(first) = skipped.first() {
            self.warnings.push(format!(
                "{} row(s) skipped; first at line {}: {}",
                skipped.len(),
                first.line,
                first.reason
            ));
        }
        self
    }

    /// Marks the result as empty.
    pub fn empty(mut self, message: impl Into<String>) -> Result<Self, CliError> {
        self.errors.push(EnvelopeError::new(EMPTY_RESULT, message)?);
        Ok(self)
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let request_id = RequestId::new_v4();
    let input = input_of(&cli.command);
    let span = tracing::info_span!("command", %request_id, input = %input.display());
    let _entered = span.enter();

    let command_result = match &cli.command {
        Command::Book(args) => book::run(args)?,
        Command::Split(args) => split::run(args)?,
        Command::Digits(args) => digits::run(args)?,
        Command::Heatmap(args) => heatmap::run(args)?,
        Command::Ticks(args) => ticks::run(args)?,
        Command::Ohlc(args) => ohlc::run(args)?,
        Command::Pivot(args) => pivot::run(args)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        rows_read,
        rows_skipped,
    } = command_result;

    let mut metadata = Metadata::new(request_id, input.display().to_string());
    metadata.rows_read = rows_read;
    metadata.rows_skipped = rows_skipped;
    metadata.latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    tracing::info!(
        rows_read,
        rows_skipped,
        latency_ms = metadata.latency_ms,
        "command finished"
    );

    let meta = metadata.into_envelope_meta()?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn input_of(command: &Command) -> &Path {
    match command {
        Command::Book(args) => args.input.as_path(),
        Command::Split(args) => args.input.as_path(),
        Command::Digits(args) => args.input.as_path(),
        Command::Heatmap(args) => args.input.as_path(),
        Command::Ticks(args) | Command::Ohlc(args) => args.input.as_path(),
        Command::Pivot(args) => args.input.as_path(),
    }
}

fn load_table(path: &Path) -> Result<Table, CliError> {
    let table = Table::from_path(path)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "loaded input"
    );
    Ok(table)
}

fn require_columns<'a>(
    table: &Table,
    columns: impl IntoIterator<Item = &'a str>,
) -> Result<(), SchemaError> {
    for column in columns {
        if !table.has_column(column) {
            return Err(SchemaError::MissingColumn {
                column: column.to_owned(),
            });
        }
    }
    Ok(())
}
