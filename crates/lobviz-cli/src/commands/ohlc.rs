use lobviz_core::ohlc::{self, CLOSE_COLUMN, DATE_COLUMN, HIGH_COLUMN, LOW_COLUMN, OPEN_COLUMN};
use lobviz_core::OhlcBar;
use serde::Serialize;

use crate::cli::InputArgs;
use crate::error::CliError;

use super::{load_table, require_columns, CommandResult};

#[derive(Debug, Serialize)]
struct OhlcResponseData {
    bars: Vec<OhlcBar>,
}

pub fn run(args: &InputArgs) -> Result<CommandResult, CliError> {
    let table = load_table(&args.input)?;
    require_columns(
        &table,
        [DATE_COLUMN, OPEN_COLUMN, HIGH_COLUMN, LOW_COLUMN, CLOSE_COLUMN],
    )?;

    let batch = ohlc::read_bars(table.rows());
    let empty = batch.is_empty();

    let data = serde_json::to_value(OhlcResponseData { bars: batch.items })?;
    let result = CommandResult::ok(data, table.len()).with_skipped(&batch.skipped);
    if empty {
        return result.empty(format!("no bars could be read from {}", args.input.display()));
    }
    Ok(result)
}
