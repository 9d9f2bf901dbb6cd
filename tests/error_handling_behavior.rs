//! Behavior-driven tests for error handling
//!
//! Whole-file problems fail loudly with typed errors; problems inside a row
//! only cost that row or level.

use lobviz_core::{
    BinningError, CoreError, FieldError, HeatmapConfig, PlaybackState, PriceTimeHeatmap,
    SchemaError, TableError, TimestampError, ValidationError,
};
use lobviz_tests::{book_header, csv_fixture, csv_text, BookSchema, RowReshaper, Table, TabularRow};

// =============================================================================
// Error Handling: Input Files
// =============================================================================

#[test]
fn when_input_file_is_missing_user_gets_the_path_back() {
    // Given: A path that does not exist
    let path = "/nonexistent/lobviz/lob.csv";

    // When: The table is loaded
    let err = Table::from_path(path).expect_err("must fail");

    // Then: The error names the path
    assert!(err.to_string().contains(path));
    assert!(matches!(err, TableError::Open { .. }));
}

#[test]
fn when_header_lacks_top_level_columns_loading_fails_before_any_row() {
    // Given: A book export missing ask_01_qty
    let mut header = vec![String::from("timestamp")];
    header.extend(book_header("", 2));
    header.retain(|column| column != "ask_01_qty");
    let file = csv_fixture(&csv_text(&header, &[]));
    let table = Table::from_path(file.path()).expect("fixture must load");

    // When: The layout is resolved
    let err = RowReshaper::new(&BookSchema::default(), table.headers()).expect_err("must fail");

    // Then: The missing column is named
    let err = CoreError::from(err);
    assert_eq!(err.to_string(), "required column 'ask_01_qty' is missing from the header");
}

#[test]
fn when_no_timestamp_column_exists_the_candidates_are_listed() {
    // Given: A header with book columns only
    let header = book_header("", 1);

    // When: The layout is resolved
    let err = BookSchema::default().resolve(&header).expect_err("must fail");

    // Then: The expected timestamp column is mentioned
    assert!(matches!(
        err,
        SchemaError::NoTimestampColumn { ref candidates } if candidates == "timestamp"
    ));
}

// =============================================================================
// Error Handling: Rows and Fields
// =============================================================================

#[test]
fn when_timestamp_is_unreadable_the_row_is_skipped_not_backfilled() {
    // Given: Two rows, one with a junk timestamp
    let mut header = vec![String::from("timestamp")];
    header.extend(book_header("", 1));
    let rows = vec![
        vec!["yesterday", "100", "1", "101", "1"],
        vec!["2023-03-24T10:45:32", "100", "1", "101", "1"],
    ]
    .into_iter()
    .map(|row| row.into_iter().map(String::from).collect())
    .collect::<Vec<Vec<String>>>();
    let file = csv_fixture(&csv_text(&header, &rows));
    let table = Table::from_path(file.path()).expect("fixture must load");

    // When: The table is reshaped
    let reshaper =
        RowReshaper::new(&BookSchema::new(1).expect("depth"), table.headers()).expect("layout");
    let batch = reshaper.reshape_all(table.rows());

    // Then: One snapshot is built and line 2 is reported
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].line, 2);
    assert_eq!(
        batch.skipped[0].reason,
        TimestampError::Unrecognized {
            value: String::from("yesterday")
        }
        .to_string()
    );
}

#[test]
fn when_a_cell_is_not_numeric_the_error_names_the_column() {
    // Given: A row with a junk price
    let row = TabularRow::from_pairs(5, [("bid_01_price", "1O0")]);

    // When: The cell is read as a number
    let err = row.number("bid_01_price").expect_err("must fail");

    // Then: Column and value are reported
    assert_eq!(
        err,
        FieldError::Malformed {
            column: String::from("bid_01_price"),
            value: String::from("1O0")
        }
    );
}

// =============================================================================
// Error Handling: Binning and Playback
// =============================================================================

#[test]
fn when_bin_parameters_are_not_positive_binning_is_refused() {
    // Given / When: Zero, negative and non-finite parameters
    // Then: Each is rejected before any data is read
    assert!(matches!(
        HeatmapConfig::new(0.0, 60.0),
        Err(BinningError::InvalidBinSize { .. })
    ));
    assert!(matches!(
        HeatmapConfig::new(1.0, 0.0),
        Err(BinningError::InvalidInterval { .. })
    ));
    assert!(matches!(
        HeatmapConfig::new(f64::INFINITY, 60.0),
        Err(BinningError::InvalidBinSize { .. })
    ));
}

#[test]
fn when_there_are_no_points_binning_reports_it() {
    // Given: A valid configuration and no trades
    let config = HeatmapConfig::new(1.0, 60.0).expect("config");

    // When: A heatmap is requested
    let err = PriceTimeHeatmap::build(config, &[]).expect_err("must fail");

    // Then: The error says there was nothing to bin
    assert_eq!(err, BinningError::NoPoints);
}

#[test]
fn when_seeking_past_the_last_frame_the_cursor_refuses() {
    // Given: A three-frame playback
    let state = PlaybackState::new(3).expect("frames");

    // When: Frame 3 is requested
    let err = state.seek(3).expect_err("must fail");

    // Then: The range is reported and the state is unchanged
    assert_eq!(
        err,
        ValidationError::FrameOutOfRange {
            index: 3,
            frame_count: 3
        }
    );
    assert_eq!(state.index(), 0);
}
