use lobviz_core::{SplitBook, SplitReshaper};
use serde::Serialize;

use crate::cli::SplitArgs;
use crate::error::CliError;

use super::{load_table, CommandResult};

#[derive(Debug, Serialize)]
struct SplitResponseData {
    books: Vec<SplitBook>,
}

pub fn run(args: &SplitArgs) -> Result<CommandResult, CliError> {
    let table = load_table(&args.input)?;
    let reshaper = SplitReshaper::new(args.levels, table.headers())?;
    let batch = reshaper.reshape_all(table.rows());
    let empty = batch.is_empty();

    let data = serde_json::to_value(SplitResponseData { books: batch.items })?;
    let result = CommandResult::ok(data, table.len()).with_skipped(&batch.skipped);
    if empty {
        return result.empty(format!(
            "no split book could be built from {}",
            args.input.display()
        ));
    }
    Ok(result)
}
