use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};
use unicode_width::UnicodeWidthStr;

use crate::records::ContactList;

const MAX_COLUMN_WIDTH: usize = 48;

pub fn build_table<'a>(
    rows: Vec<Row<'a>>,
    header: Row<'a>,
    widths: Vec<Constraint>,
    title: impl Into<String>,
) -> Table<'a> {
    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.into()))
        .column_spacing(2)
}

pub fn highlight_row(row: Row<'_>) -> Row<'_> {
    row.reversed()
}

/// Column widths sized to the widest of header and cells, capped so wide URLs do not
/// push every other column off screen.
pub fn column_widths(list: &ContactList) -> Vec<Constraint> {
    list.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let data_width = list
                .rows()
                .iter()
                .filter_map(|record| record.get(idx))
                .map(UnicodeWidthStr::width)
                .max()
                .unwrap_or(0);
            let width = UnicodeWidthStr::width(column.as_str())
                .max(data_width)
                .min(MAX_COLUMN_WIDTH);
            Constraint::Length(u16::try_from(width).unwrap_or(u16::MAX))
        })
        .collect()
}

/// Header plus the `[offset, offset + capacity)` window of rows, with `selected` reversed.
pub fn table_rows<'a>(
    list: &'a ContactList,
    offset: usize,
    capacity: usize,
    selected: Option<usize>,
) -> (Row<'a>, Vec<Row<'a>>) {
    let header = Row::new(
        list.columns()
            .iter()
            .map(|column| Cell::from(column.as_str()).style(Style::default().fg(Color::Yellow))),
    );

    let end = (offset + capacity).min(list.len());
    let rows = list.rows()[offset.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let row = Row::new(record.values().iter().map(|value| Cell::from(value.as_str())));
            if selected == Some(offset + i) {
                highlight_row(row)
            } else {
                row
            }
        })
        .collect();

    (header, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ContactList, ContactRecord};

    fn table() -> ContactList {
        ContactList::new(
            "t",
            vec!["Name".to_string(), "Profile_URL".to_string()],
            vec![
                ContactRecord::new(vec!["Åsa".to_string(), "x".repeat(80)]),
                ContactRecord::new(vec!["Bo".to_string(), "y".to_string()]),
            ],
        )
    }

    #[test]
    fn widths_cover_headers_and_cap_long_cells() {
        let widths = column_widths(&table());
        assert_eq!(
            widths,
            vec![
                Constraint::Length(4),
                Constraint::Length(MAX_COLUMN_WIDTH as u16)
            ]
        );
    }

    #[test]
    fn window_is_clamped_to_list_length() {
        let list = table();
        let (_, rows) = table_rows(&list, 1, 10, Some(1));
        assert_eq!(rows.len(), 1);
        let (_, rows) = table_rows(&list, 5, 10, None);
        assert!(rows.is_empty());
    }
}
