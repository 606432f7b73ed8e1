use std::collections::HashMap;

use calamine::{Data, Range};

use super::{ContactList, ContactRecord};

/// Convert a worksheet range into a contact list.
///
/// The first non-blank row is the header. Empty headers become `Unnamed: <idx>` and
/// repeated headers get `.1`, `.2`, ... suffixes. Header and cell text is kept verbatim.
/// Blank data rows are dropped.
pub fn list_from_range(name: &str, range: &Range<Data>) -> ContactList {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .skip_while(|cells| is_blank(cells));

    let Some(header) = rows.next() else {
        return ContactList::new(name, Vec::new(), Vec::new());
    };

    let columns = header_names(&header);
    let records = rows
        .filter(|cells| !is_blank(cells))
        .map(ContactRecord::new)
        .collect();

    ContactList::new(name, columns, records)
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}

fn header_names(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(raw.len());

    for (idx, cell) in raw.iter().enumerate() {
        let mut name = if cell.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            cell.clone()
        };

        // Keep suffixing until the name is unused: `Email, Email, Email.1` must not collide.
        let mut count = seen.get(&name).copied().unwrap_or(0);
        while count > 0 {
            seen.insert(name.clone(), count + 1);
            name = format!("{name}.{count}");
            count = seen.get(&name).copied().unwrap_or(0);
        }
        seen.insert(name.clone(), 1);
        columns.push(name);
    }

    columns
}

/// Render a cell the way it should appear in tables and exports.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(value) => value.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// Integral values print without a fractional part; non-finite values are blank.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        String::new()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
