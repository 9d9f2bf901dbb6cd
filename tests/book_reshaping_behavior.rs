//! Behavior-driven tests for order book reshaping
//!
//! These tests load CSV exports the way the CLI does and check what a chart
//! would receive.

use lobviz_core::{aggregate, SchemaError, SplitReshaper};
use lobviz_tests::{
    book_header, csv_fixture, csv_text, BookSchema, BookSnapshot, PriceLevel, RowReshaper, Table,
    TabularRow, UtcDateTime,
};

fn single_book_table(rows: &[Vec<String>]) -> Table {
    let mut header = vec![String::from("timestamp")];
    header.extend(book_header("", 11));
    let file = csv_fixture(&csv_text(&header, rows));
    Table::from_path(file.path()).expect("fixture must load")
}

fn full_row(timestamp: &str) -> Vec<String> {
    let mut cells = vec![timestamp.to_owned()];
    for level in 1..=11 {
        cells.push(format!("{}", 100 - level));
        cells.push(String::from("10"));
    }
    for level in 1..=11 {
        cells.push(format!("{}", 101 + level));
        cells.push(String::from("5"));
    }
    cells
}

// =============================================================================
// Book Reshaping: Depth
// =============================================================================

#[test]
fn when_level_five_is_missing_deeper_levels_are_dropped() {
    // Given: A row whose bid level 5 is empty but levels 6..11 are filled
    let mut row = full_row("2023-03-24T10:45:32");
    row[9] = String::new();
    row[10] = String::new();
    let table = single_book_table(&[row]);

    // When: The row is reshaped
    let reshaper = RowReshaper::new(&BookSchema::default(), table.headers()).expect("layout");
    let batch = reshaper.reshape_all(table.rows());

    // Then: Exactly four bid levels survive and asks are untouched
    let snapshot = &batch.items[0];
    assert_eq!(snapshot.bids.len(), 4);
    assert_eq!(snapshot.asks.len(), 11);
    assert!(snapshot.bids.iter().all(|level| level.price > 95.0));
}

#[test]
fn when_depth_is_capped_no_side_exceeds_it() {
    // Given: An 11-level export read with a 3-level schema
    let table = single_book_table(&[full_row("2023-03-24T10:45:32")]);
    let schema = BookSchema::new(3).expect("valid depth");

    // When: The table is reshaped
    let reshaper = RowReshaper::new(&schema, table.headers()).expect("layout");
    let snapshot = reshaper.reshape_all(table.rows()).items.remove(0);

    // Then: Each side carries at most three levels, best first
    assert_eq!(snapshot.bids.len(), 3);
    assert_eq!(snapshot.asks.len(), 3);
    assert_eq!(snapshot.bids[0].price, 99.0);
    assert_eq!(snapshot.asks[0].price, 102.0);
}

#[test]
fn when_a_row_is_reshaped_twice_the_snapshots_are_equal() {
    // Given: One row of a loaded table
    let table = single_book_table(&[full_row("2023-03-24T10:45:32")]);
    let reshaper = RowReshaper::new(&BookSchema::default(), table.headers()).expect("layout");

    // When: The same row is reshaped twice
    let first = reshaper.reshape(&table.rows()[0]).expect("first");
    let second = reshaper.reshape(&table.rows()[0]).expect("second");

    // Then: The results are structurally equal
    assert_eq!(first, second);
}

// =============================================================================
// Book Reshaping: Mid-Price
// =============================================================================

#[test]
fn when_both_sides_have_a_best_level_mid_price_is_their_average() {
    // Given: A best bid at 100 and a best ask at 102
    let timestamp = UtcDateTime::parse("2023-03-24T10:45:32Z").expect("timestamp");
    let bids = vec![PriceLevel::new(100.0, 5.0).expect("bid")];
    let asks = vec![PriceLevel::new(102.0, 3.0).expect("ask")];

    // When: A snapshot is built
    let snapshot = BookSnapshot::new(timestamp, bids, asks);

    // Then: The mid-price is 101
    assert_eq!(snapshot.mid_price, Some(101.0));
}

#[test]
fn when_one_side_is_empty_mid_price_is_absent() {
    // Given: A row with only bid levels
    let row = TabularRow::from_pairs(
        2,
        [
            ("timestamp", "2023-03-24T10:45:32"),
            ("bid_01_price", "100"),
            ("bid_01_qty", "5"),
        ],
    );
    let mut header = vec![String::from("timestamp")];
    header.extend(book_header("", 1));
    let reshaper = RowReshaper::new(&BookSchema::new(1).expect("depth"), &header).expect("layout");

    // When: The row is reshaped
    let snapshot = reshaper.reshape(&row).expect("must reshape");

    // Then: No mid-price is invented
    assert_eq!(snapshot.mid_price, None);
    assert_eq!(snapshot.bids.len(), 1);
}

// =============================================================================
// Split Books
// =============================================================================

#[test]
fn when_old_and_new_books_merge_every_price_appears_once_with_summed_volume() {
    // Given: A split-book export with overlapping and distinct prices
    let mut header = vec![String::from("new_tag60_unix_nanoseconds")];
    header.extend(book_header("old_", 2));
    header.extend(book_header("new_", 2));
    let row: Vec<String> = [
        "20250328140000000000000",
        // old bids, old asks
        "100", "5", "99", "2", "101", "4", "102", "1",
        // new bids, new asks
        "100", "3", "98", "7", "101", "6", "101.5", "8",
    ]
    .iter()
    .map(|cell| cell.to_string())
    .collect();
    let file = csv_fixture(&csv_text(&header, &[row]));
    let table = Table::from_path(file.path()).expect("fixture must load");

    // When: The rows are reshaped and aggregated
    let reshaper = SplitReshaper::new(2, table.headers()).expect("layout");
    let batch = reshaper.reshape_all(table.rows());
    let book = &batch.items[0];

    // Then: Prices are unique per side, ordered, and volumes add up
    let bids: Vec<f64> = book.bids.iter().map(|level| level.price).collect();
    let asks: Vec<f64> = book.asks.iter().map(|level| level.price).collect();
    assert_eq!(bids, vec![100.0, 99.0, 98.0]);
    assert_eq!(asks, vec![101.0, 101.5, 102.0]);
    for level in book.bids.iter().chain(book.asks.iter()) {
        assert_eq!(level.total_volume, level.new_volume + level.old_volume);
    }
    assert_eq!(book.bids[0].total_volume, 8.0);
    assert_eq!(book.asks[0].total_volume, 10.0);
    assert_eq!(book.mid_price, Some(100.5));
    assert_eq!(book.timestamp.format_rfc3339(), "2025-03-28T14:00:00Z");
}

#[test]
fn when_books_are_disjoint_no_price_is_lost() {
    // Given: Two books with no price in common
    let timestamp = UtcDateTime::parse("2023-03-24T10:45:32Z").expect("timestamp");
    let old = BookSnapshot::new(
        timestamp,
        vec![PriceLevel::new(10.0, 1.0).expect("level")],
        Vec::new(),
    );
    let new = BookSnapshot::new(
        timestamp,
        vec![PriceLevel::new(11.0, 2.0).expect("level")],
        vec![PriceLevel::new(12.0, 3.0).expect("level")],
    );

    // When: They are aggregated
    let merged = aggregate(&old, &new);

    // Then: Both bid prices survive with zero volume from the absent side
    assert_eq!(merged.bids.len(), 2);
    assert_eq!(merged.bids[0].old_volume, 0.0);
    assert_eq!(merged.bids[1].new_volume, 0.0);
    assert_eq!(merged.asks.len(), 1);
}

// =============================================================================
// Header Validation
// =============================================================================

#[test]
fn when_split_header_lacks_an_old_book_the_error_names_the_column() {
    // Given: A split export without any old_ columns
    let mut header = vec![String::from("tag60")];
    header.extend(book_header("new_", 1));

    // When: The split layout is resolved
    let err = SplitReshaper::new(1, &header).expect_err("must fail");

    // Then: The first missing column is reported
    assert_eq!(
        err,
        SchemaError::MissingColumn {
            column: String::from("old_bid_01_price")
        }
    );
}
