use lobviz_core::digits::{DigitCell, POSITIONS};
use lobviz_core::DigitFrequency;
use serde::Serialize;

use crate::cli::DigitsArgs;
use crate::error::CliError;

use super::{load_table, require_columns, CommandResult};

#[derive(Debug, Serialize)]
struct DigitsResponseData {
    column: String,
    positions: usize,
    distinct: usize,
    max_count: u64,
    cells: Vec<DigitCell>,
}

pub fn run(args: &DigitsArgs) -> Result<CommandResult, CliError> {
    let table = load_table(&args.input)?;
    require_columns(&table, [args.column.as_str()])?;

    let (frequency, skipped) = DigitFrequency::from_rows(table.rows(), &args.column);
    let distinct = frequency.distinct();

    let data = serde_json::to_value(DigitsResponseData {
        column: args.column.clone(),
        positions: POSITIONS,
        distinct,
        max_count: frequency.max_count(),
        cells: frequency.cells(),
    })?;

    let result = CommandResult::ok(data, table.len()).with_skipped(&skipped);
    if distinct == 0 {
        return result.empty(format!("no numeric timestamps in column '{}'", args.column));
    }
    Ok(result)
}
