//! Long-to-wide pivot for per-category result series.
//!
//! Each row holds one category, one x value and a set of metric columns.
//! Output has one point per distinct x with values keyed
//! `{category}_{metric}`, category lowercased.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::batch::Batch;
use crate::table::TabularRow;
use crate::FieldError;

/// Maps one value column to the metric name used in series keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricColumn {
    pub column: String,
    pub metric: String,
}

impl MetricColumn {
    pub fn new(column: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            metric: metric.into(),
        }
    }

    /// Parses `COLUMN=metric`; a bare `COLUMN` uses itself as the metric.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('=') {
            Some((column, metric)) => Self::new(column.trim(), metric.trim()),
            None => Self::new(spec.trim(), spec.trim()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotSpec {
    pub category: String,
    pub x: String,
    pub values: Vec<MetricColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotPoint {
    pub x: f64,
    pub values: BTreeMap<String, f64>,
}

pub fn series_key(category: &str, metric: &str) -> String {
    format!("{}_{}", category.to_lowercase(), metric)
}

impl PivotSpec {
    pub fn new(
        category: impl Into<String>,
        x: impl Into<String>,
        values: Vec<MetricColumn>,
    ) -> Self {
        Self {
            category: category.into(),
            x: x.into(),
            values,
        }
    }

    /// Points sorted by x. A row with a bad category or x is skipped; a bad
    /// metric cell only leaves that key out.
    pub fn pivot(&self, rows: &[TabularRow]) -> Batch<PivotPoint> {
        let mut batch = Batch::new();
        let mut points: BTreeMap<OrderedFloat<f64>, BTreeMap<String, f64>> = BTreeMap::new();

        for row in rows {
            let category = match row.text(&self.category) {
                Ok(category) => category,
                Err(error) => {
                    batch.skip(row.line(), error);
                    continue;
                }
            };
            let x = match row.number(&self.x) {
                Ok(x) => x,
                Err(error) => {
                    batch.skip(row.line(), error);
                    continue;
                }
            };

            let values = points.entry(OrderedFloat(x)).or_default();
            for metric in &self.values {
                match row.number(&metric.column) {
                    Ok(value) => {
                        values.insert(series_key(category, &metric.metric), value);
                    }
                    Err(FieldError::Missing { .. }) => {}
                    Err(error) => {
                        tracing::warn!(
                            line = row.line(),
                            column = %metric.column,
                            error = %error,
                            "leaving metric out of pivot point"
                        );
                    }
                }
            }
        }

        for (x, values) in points {
            batch.push(PivotPoint {
                x: x.into_inner(),
                values,
            });
        }
        batch
    }

    /// Every series key the pivot can produce for the given rows, sorted.
    pub fn series_keys(&self, rows: &[TabularRow]) -> Vec<String> {
        let mut keys: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get(&self.category))
            .flat_map(|category| {
                self.values
                    .iter()
                    .map(move |metric| series_key(category, &metric.metric))
            })
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}
