use lobviz_core::{BookSchema, BookSnapshot, PlaybackState, RowReshaper};
use serde::Serialize;

use crate::cli::BookArgs;
use crate::error::CliError;

use super::{load_table, CommandResult};

#[derive(Debug, Serialize)]
struct BookResponseData {
    levels: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    playback: Option<PlaybackState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<BookSnapshot>,
    snapshots: Vec<BookSnapshot>,
}

pub fn run(args: &BookArgs) -> Result<CommandResult, CliError> {
    let table = load_table(&args.input)?;
    let schema = BookSchema::new(args.levels)?;
    let reshaper = RowReshaper::new(&schema, table.headers())?;
    let depth = reshaper.layout().bids.len().min(reshaper.layout().asks.len());

    let batch = reshaper.reshape_all(table.rows());
    let empty = batch.is_empty();
    let playback = if empty {
        None
    } else {
        Some(cursor(batch.len(), args.frame, args.advance)?)
    };
    let frame = playback.and_then(|state| batch.items.get(state.index()).cloned());

    let data = serde_json::to_value(BookResponseData {
        levels: depth,
        playback,
        frame,
        snapshots: batch.items,
    })?;

    let mut result = CommandResult::ok(data, table.len()).with_skipped(&batch.skipped);
    if depth < args.levels {
        result = result.with_warning(format!(
            "header carries {depth} of {} requested levels",
            args.levels
        ));
    }
    if empty {
        result = result.empty(format!(
            "no book snapshot could be built from {}",
            args.input.display()
        ))?;
    }
    Ok(result)
}

/// Positions the cursor on `frame`, then plays `advance` timer ticks.
fn cursor(frames: usize, frame: Option<usize>, advance: usize) -> Result<PlaybackState, CliError> {
    let mut state = PlaybackState::new(frames)?;
    if let Some(frame) = frame {
        state = state.seek(frame)?;
    }
    if advance > 0 {
        state = state.toggle();
        for _ in 0..advance {
            state = state.advance();
        }
    }
    Ok(state)
}
