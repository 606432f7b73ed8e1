use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{Context, Result};

use super::{ContactList, ContactRecord};

/// Serialize a list to CSV: one header line in schema order, then one line per row.
pub fn to_csv_bytes(list: &ContactList) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !list.columns().is_empty() {
        writer.write_record(list.columns())?;
        for record in list.rows() {
            writer.write_record(record.values())?;
        }
    }
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|err| err.into_error())
        .context("Failed to finish CSV buffer")?;
    Ok(bytes)
}

/// Parse CSV produced by `to_csv_bytes` back into a list.
pub fn parse_csv<R: Read>(name: &str, reader: R) -> Result<ContactList> {
    let mut reader = csv::Reader::from_reader(reader);
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        rows.push(ContactRecord::new(
            record.iter().map(str::to_string).collect(),
        ));
    }

    Ok(ContactList::new(name, columns, rows))
}

/// Write the list as CSV to `path`, creating parent directories as needed.
pub fn save_csv<P: AsRef<Path>>(list: &ContactList, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create export directory {}", parent.display())
            })?;
        }
    }

    let bytes = to_csv_bytes(list)?;
    fs::write(path, bytes)
        .with_context(|| format!("Failed to write export file {}", path.display()))?;
    Ok(())
}

/// Unique trimmed e-mail addresses from the configured columns, in first-seen order.
pub fn extract_emails(list: &ContactList, email_columns: &[String]) -> Vec<String> {
    let indices: Vec<usize> = email_columns
        .iter()
        .filter_map(|column| list.column_index(column))
        .collect();

    let mut seen = HashSet::new();
    let mut emails = Vec::new();
    // Column by column, matching the original concatenation order.
    for index in indices {
        for record in list.rows() {
            let value = record.get(index).unwrap_or_default().trim();
            if value.is_empty() || value == "nan" {
                continue;
            }
            if seen.insert(value.to_string()) {
                emails.push(value.to_string());
            }
        }
    }
    emails
}
