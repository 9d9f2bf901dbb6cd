use lobviz_core::{MetricColumn, PivotPoint, PivotSpec};
use serde::Serialize;

use crate::cli::PivotArgs;
use crate::error::CliError;

use super::{load_table, require_columns, CommandResult};

#[derive(Debug, Serialize)]
struct PivotResponseData {
    series: Vec<String>,
    points: Vec<PivotPoint>,
}

pub fn run(args: &PivotArgs) -> Result<CommandResult, CliError> {
    let table = load_table(&args.input)?;
    let values: Vec<MetricColumn> = args
        .values
        .iter()
        .map(|value| MetricColumn::parse(value))
        .collect();
    if let Some(blank) = values
        .iter()
        .find(|value| value.column.is_empty() || value.metric.is_empty())
    {
        return Err(CliError::Command(format!(
            "--value '{}={}' needs both a column and a metric name",
            blank.column, blank.metric
        )));
    }

    require_columns(
        &table,
        [args.category.as_str(), args.x.as_str()]
            .into_iter()
            .chain(values.iter().map(|value| value.column.as_str())),
    )?;

    let spec = PivotSpec::new(args.category.clone(), args.x.clone(), values);
    let series = spec.series_keys(table.rows());
    let batch = spec.pivot(table.rows());
    let empty = batch.is_empty();

    let data = serde_json::to_value(PivotResponseData {
        series,
        points: batch.items,
    })?;
    let result = CommandResult::ok(data, table.len()).with_skipped(&batch.skipped);
    if empty {
        return result.empty(format!(
            "no pivot points could be built from {}",
            args.input.display()
        ));
    }
    Ok(result)
}
