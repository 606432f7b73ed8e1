pub mod export;
pub mod filter;
pub mod normalize;
mod proptests;
pub mod sheet;
pub mod workbook;

pub use export::{extract_emails, parse_csv, save_csv, to_csv_bytes};
pub use filter::{
    apply_filters, select_options, value_bounds, FilterSpec, NumericRange, ViewOptions,
};
pub use normalize::normalize_list;
pub use sheet::{cell_to_string, format_number, list_from_range};
pub use workbook::{CalamineSource, SheetSource, Workbook};

/// One row of a contact list. Cells are kept as display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    values: Vec<String>,
}

impl ContactRecord {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub(crate) fn set(&mut self, index: usize, value: String) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    pub(crate) fn push(&mut self, value: String) {
        self.values.push(value);
    }
}

/// Ordered rows of one sheet sharing a fixed column schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactList {
    name: String,
    columns: Vec<String>,
    rows: Vec<ContactRecord>,
}

impl ContactList {
    /// Build a list, padding or truncating rows so every row matches the schema width.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<ContactRecord>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|record| {
                let mut values = record.values;
                values.resize(width, String::new());
                ContactRecord { values }
            })
            .collect();
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ContactRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact header match first, then one that differs only by surrounding whitespace.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name == column)
            .or_else(|| {
                let wanted = column.trim();
                self.columns.iter().position(|name| name.trim() == wanted)
            })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|record| record.get(index))
    }

    /// Same schema, different rows.
    pub fn with_rows(&self, rows: Vec<ContactRecord>) -> Self {
        Self::new(self.name.clone(), self.columns.clone(), rows)
    }

    /// Restrict to `columns` that exist, in the order given. An empty selection keeps
    /// every column.
    pub fn project(&self, columns: &[String]) -> Self {
        let indices: Vec<usize> = columns
            .iter()
            .filter_map(|column| self.column_index(column))
            .collect();
        if indices.is_empty() {
            return self.clone();
        }

        let projected_columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|record| {
                ContactRecord::new(
                    indices
                        .iter()
                        .map(|&i| record.get(i).unwrap_or_default().to_string())
                        .collect(),
                )
            })
            .collect();
        Self::new(self.name.clone(), projected_columns, rows)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<ContactRecord> {
        &mut self.rows
    }

    /// Append a column filled with `fill`; returns its index.
    pub(crate) fn push_column(&mut self, column: &str, fill: &str) -> usize {
        self.columns.push(column.to_string());
        for record in &mut self.rows {
            record.push(fill.to_string());
        }
        self.columns.len() - 1
    }
}
