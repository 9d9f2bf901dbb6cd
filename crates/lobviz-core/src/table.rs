//! CSV loading into loosely-typed rows.
//!
//! Cells stay as text until a transform asks for a typed value, so a bad
//! cell only costs the level or row that reads it.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::FieldError;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("input has no header row")]
    NoHeader,
}

/// One data line keyed by (trimmed) column name. Empty cells are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularRow {
    line: u64,
    cells: BTreeMap<String, String>,
}

impl TabularRow {
    pub fn new(line: u64) -> Self {
        Self {
            line,
            cells: BTreeMap::new(),
        }
    }

    pub fn from_pairs<K, V>(line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new(line);
        for (key, value) in pairs {
            row.insert(key, value);
        }
        row
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.cells.insert(column.into(), trimmed.to_owned());
    }

    /// 1-based line number in the source file (header is line 1).
    pub const fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// First present cell among `columns`, with the column that held it.
    pub fn first_of<'a>(&'a self, columns: &'a [String]) -> Option<(&'a str, &'a str)> {
        columns
            .iter()
            .find_map(|column| self.get(column).map(|value| (column.as_str(), value)))
    }

    pub fn text(&self, column: &str) -> Result<&str, FieldError> {
        self.get(column).ok_or_else(|| FieldError::Missing {
            column: column.to_owned(),
        })
    }

    /// Finite number.
    pub fn number(&self, column: &str) -> Result<f64, FieldError> {
        let raw = self.text(column)?;
        let value = raw.parse::<f64>().map_err(|_| FieldError::Malformed {
            column: column.to_owned(),
            value: raw.to_owned(),
        })?;
        if !value.is_finite() {
            return Err(FieldError::NonFinite {
                column: column.to_owned(),
            });
        }
        Ok(value)
    }

    /// Finite, non-negative number.
    pub fn non_negative(&self, column: &str) -> Result<f64, FieldError> {
        let value = self.number(column)?;
        if value < 0.0 {
            return Err(FieldError::Negative {
                column: column.to_owned(),
            });
        }
        Ok(value)
    }
}

/// Parsed CSV with its header.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<TabularRow>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<TabularRow>) -> Self {
        Self { headers, rows }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TableError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        if headers.iter().all(String::is_empty) {
            return Err(TableError::NoHeader);
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(csv::Position::line)
                .unwrap_or(index as u64 + 2);
            let mut row = TabularRow::new(line);
            for (column, value) in headers.iter().zip(record.iter()) {
                row.insert(column.as_str(), value);
            }
            rows.push(row);
        }

        tracing::debug!(columns = headers.len(), rows = rows.len(), "loaded table");
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|header| header == column)
    }

    pub fn rows(&self) -> &[TabularRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
