use lobviz_core::heatmap::{PRICE_COLUMN, QUANTITY_COLUMN, TIMESTAMP_COLUMN};
use lobviz_core::{HeatmapConfig, PriceTimeHeatmap, TradePoint};
use serde_json::json;

use crate::cli::HeatmapArgs;
use crate::error::CliError;

use super::{load_table, require_columns, CommandResult};

pub fn run(args: &HeatmapArgs) -> Result<CommandResult, CliError> {
    let config = HeatmapConfig::new(args.bin_size, args.interval_secs)?;
    let table = load_table(&args.input)?;
    require_columns(&table, [TIMESTAMP_COLUMN, PRICE_COLUMN, QUANTITY_COLUMN])?;

    let batch = TradePoint::from_rows(table.rows());
    if batch.is_empty() {
        let data = json!({ "price_bins": [], "time_bins": [], "cells": [] });
        return CommandResult::ok(data, table.len())
            .with_skipped(&batch.skipped)
            .empty(format!("no trades could be read from {}", args.input.display()));
    }

    let heatmap = PriceTimeHeatmap::build(config, &batch.items)?;
    let data = serde_json::to_value(heatmap)?;
    Ok(CommandResult::ok(data, table.len()).with_skipped(&batch.skipped))
}
