use std::fmt::Display;

use serde::Serialize;

/// A row left out of a transform, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Output of a row-by-row transform: what was built and what was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRow>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Batch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn skip(&mut self, line: u64, reason: impl Display) {
        let reason = reason.to_string();
        tracing::warn!(line, reason = %reason, "skipping row");
        self.skipped.push(SkippedRow { line, reason });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Batch<U> {
        Batch {
            items: f(self.items),
            skipped: self.skipped,
        }
    }
}
