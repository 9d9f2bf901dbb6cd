use lobviz_core::ticks::{PRICE_COLUMN, TIMESTAMP_COLUMN};
use lobviz_core::TickSeries;

use crate::cli::InputArgs;
use crate::error::CliError;

use super::{load_table, require_columns, CommandResult};

pub fn run(args: &InputArgs) -> Result<CommandResult, CliError> {
    let table = load_table(&args.input)?;
    require_columns(&table, [TIMESTAMP_COLUMN, PRICE_COLUMN])?;

    let mut batch = TickSeries::from_rows(table.rows());
    let series = batch.items.pop().unwrap_or_else(|| TickSeries::new(Vec::new()));
    let empty = series.is_empty();

    let data = serde_json::to_value(series)?;
    let result = CommandResult::ok(data, table.len()).with_skipped(&batch.skipped);
    if empty {
        return result.empty(format!("no ticks could be read from {}", args.input.display()));
    }
    Ok(result)
}
