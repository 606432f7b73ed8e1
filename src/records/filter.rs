use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{AppError, Result};

use super::{ContactList, ContactRecord};

/// Column → accepted values. Rows must match every column (AND); any listed value
/// satisfies its column (OR).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    constraints: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.allow(column, value);
        self
    }

    /// Add an accepted value for `column`, keeping values already accepted.
    pub fn allow(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.constraints
            .entry(column.into())
            .or_default()
            .insert(value.into().trim().to_string());
    }

    /// Replace the accepted values for `column` with a single value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        self.constraints.remove(&column);
        self.allow(column, value);
    }

    pub fn clear(&mut self, column: &str) {
        self.constraints.remove(column);
    }

    pub fn accepted(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.constraints.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.constraints.iter()
    }

    /// Parse `COLUMN=VALUE` pairs as given on the command line.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self> {
        let mut spec = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((column, value)) = pair.split_once('=') else {
                return Err(AppError::invalid_selection(format!(
                    "Filter `{pair}` must look like COLUMN=VALUE"
                )));
            };
            let column = column.trim();
            if column.is_empty() {
                return Err(AppError::invalid_selection(format!(
                    "Filter `{pair}` has an empty column name"
                )));
            }
            spec.allow(column, value);
        }
        Ok(spec)
    }

    /// Human-readable summary for status lines.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "none".to_string();
        }
        self.constraints
            .iter()
            .map(|(column, values)| {
                let joined = values.iter().cloned().collect::<Vec<_>>().join(" | ");
                format!("{column} = {joined}")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Return the row subsequence matching every constraint, in input order.
    pub fn apply(&self, list: &ContactList) -> Result<ContactList> {
        if self.is_empty() {
            return Ok(list.clone());
        }

        let mut resolved = Vec::with_capacity(self.constraints.len());
        for (column, values) in &self.constraints {
            let index = list.column_index(column).ok_or_else(|| {
                AppError::invalid_selection(format!(
                    "Column `{column}` does not exist in list `{}`",
                    list.name()
                ))
            })?;
            resolved.push((index, values));
        }

        let rows = list
            .rows()
            .iter()
            .filter(|record| {
                resolved.iter().all(|(index, values)| {
                    let cell = record.get(*index).unwrap_or_default().trim();
                    values.contains(cell)
                })
            })
            .cloned()
            .collect();
        Ok(list.with_rows(rows))
    }
}

/// Inclusive bounds on a numeric column; blank or unparsable cells count as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRange {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }
}

/// Everything that narrows a list down to the visible rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOptions {
    pub filters: FilterSpec,
    pub keyword: Option<String>,
    pub range: Option<NumericRange>,
    /// `0` means no limit.
    pub limit: usize,
}

/// Column constraints, then keyword search, then numeric range, then row limit.
/// A range over a column the list lacks is ignored.
pub fn apply_filters(list: &ContactList, options: &ViewOptions) -> Result<ContactList> {
    let mut rows: Vec<ContactRecord> = options.filters.apply(list)?.rows().to_vec();

    if let Some(keyword) = options.keyword.as_deref() {
        let needle = keyword.trim().to_lowercase();
        if !needle.is_empty() {
            rows.retain(|record| {
                record
                    .values()
                    .iter()
                    .any(|cell| cell.to_lowercase().contains(&needle))
            });
        }
    }

    if let Some(range) = &options.range {
        match list.column_index(&range.column) {
            Some(index) => rows.retain(|record| {
                let value = numeric_cell(record.get(index).unwrap_or_default());
                value >= range.min && value <= range.max
            }),
            None => debug!(
                "list `{}` has no column `{}`; range filter skipped",
                list.name(),
                range.column
            ),
        }
    }

    if options.limit > 0 && options.limit < rows.len() {
        rows.truncate(options.limit);
    }

    Ok(list.with_rows(rows))
}

/// Sorted distinct non-empty values of `column`, as offered by a select filter.
pub fn select_options(list: &ContactList, column: &str) -> Vec<String> {
    let Some(index) = list.column_index(column) else {
        return Vec::new();
    };
    list.rows()
        .iter()
        .filter_map(|record| record.get(index))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Min and max of a numeric column (blank counts as zero); `None` for unknown or empty.
pub fn value_bounds(list: &ContactList, column: &str) -> Option<(f64, f64)> {
    let index = list.column_index(column)?;
    list.rows()
        .iter()
        .map(|record| numeric_cell(record.get(index).unwrap_or_default()))
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

fn numeric_cell(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
