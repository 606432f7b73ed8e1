use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::app::selector::ListSummary;
use crate::app::state::BrowseAction;
use crate::config::SheetConfig;
use crate::error::Result;
use crate::records::{ContactList, ViewOptions};
use crate::ui::components::utils::{scroll_into_view, split_horizontal, split_vertical};
use crate::ui::components::{build_table, column_widths, table_rows, TerminalGuard};
use crate::ui::styles::{header_line, pane_border, secondary_span, selection_style, ERROR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Lists,
    Table,
}

/// Cursor positions that survive across redraws and controller round-trips.
#[derive(Debug, Clone, Default)]
pub struct BrowserCursor {
    pub focus: Focus,
    pub list_index: usize,
    pub row: usize,
    pub offset: usize,
}

impl BrowserCursor {
    pub fn reset_rows(&mut self) {
        self.row = 0;
        self.offset = 0;
    }
}

/// One-line feedback shown under the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// What the user asked for; the controller turns intents into state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserIntent {
    Browse(BrowseAction),
    /// Step the n-th configured select filter.
    CycleFilter(usize),
    PromptKeyword,
    PromptRange,
    PromptLimit,
    Export,
    ShowEmails,
    ShowMessage,
    Reload,
    Quit,
}

/// Everything the browser draws, prepared by the controller.
pub struct BrowserView<'a> {
    pub summaries: &'a [ListSummary],
    pub sheet: &'a SheetConfig,
    pub table: Option<&'a ContactList>,
    pub total_rows: usize,
    pub filter_choices: &'a [(String, Vec<String>)],
    pub view: &'a ViewOptions,
    pub email_count: usize,
    pub status: Option<&'a StatusLine>,
    pub source_label: &'a str,
    pub flag: bool,
}

pub fn run_browser(
    guard: &mut TerminalGuard,
    view: &BrowserView<'_>,
    cursor: &mut BrowserCursor,
    workbook_changed: &dyn Fn() -> bool,
) -> Result<BrowserIntent> {
    let mut capacity: usize = 1;

    loop {
        guard.draw(|f| {
            capacity = draw(f, view, cursor);
        })?;

        if workbook_changed() {
            return Ok(BrowserIntent::Reload);
        }

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if let Some(intent) = handle_key(key, view, cursor, capacity) {
                    return Ok(intent);
                }
            }
        }
    }
}

fn handle_key(
    key: KeyEvent,
    view: &BrowserView<'_>,
    cursor: &mut BrowserCursor,
    capacity: usize,
) -> Option<BrowserIntent> {
    let rows = view.table.map(ContactList::len).unwrap_or(0);
    let lists = view.summaries.len();

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(BrowserIntent::Quit);
        }
        KeyCode::Esc | KeyCode::Char('q') => return Some(BrowserIntent::Quit),
        KeyCode::Tab | KeyCode::BackTab => {
            cursor.focus = match cursor.focus {
                Focus::Lists => Focus::Table,
                Focus::Table => Focus::Lists,
            };
        }
        KeyCode::Up | KeyCode::Char('k') => match cursor.focus {
            Focus::Lists if lists > 0 => {
                cursor.list_index = cursor.list_index.checked_sub(1).unwrap_or(lists - 1);
            }
            Focus::Table if rows > 0 => {
                cursor.row = cursor.row.saturating_sub(1);
                scroll_into_view(cursor.row, &mut cursor.offset, capacity);
            }
            _ => {}
        },
        KeyCode::Down | KeyCode::Char('j') => match cursor.focus {
            Focus::Lists if lists > 0 => {
                cursor.list_index = (cursor.list_index + 1) % lists;
            }
            Focus::Table if rows > 0 => {
                cursor.row = (cursor.row + 1).min(rows - 1);
                scroll_into_view(cursor.row, &mut cursor.offset, capacity);
            }
            _ => {}
        },
        KeyCode::PageDown if rows > 0 => {
            cursor.row = (cursor.row + capacity).min(rows - 1);
            scroll_into_view(cursor.row, &mut cursor.offset, capacity);
        }
        KeyCode::PageUp if rows > 0 => {
            cursor.row = cursor.row.saturating_sub(capacity);
            scroll_into_view(cursor.row, &mut cursor.offset, capacity);
        }
        KeyCode::Home => cursor.reset_rows(),
        KeyCode::End if rows > 0 => {
            cursor.row = rows - 1;
            scroll_into_view(cursor.row, &mut cursor.offset, capacity);
        }
        KeyCode::Enter if cursor.focus == Focus::Lists => {
            if let Some(summary) = view.summaries.get(cursor.list_index) {
                return Some(BrowserIntent::Browse(BrowseAction::SelectSheet(
                    summary.key.clone(),
                )));
            }
        }
        KeyCode::Enter => cursor.focus = Focus::Lists,
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            if index < view.filter_choices.len() {
                return Some(BrowserIntent::CycleFilter(index));
            }
        }
        KeyCode::Char('x') => return Some(BrowserIntent::Browse(BrowseAction::ClearFilters)),
        KeyCode::Char('/') => return Some(BrowserIntent::PromptKeyword),
        KeyCode::Char('f') if view.sheet.range_column.is_some() => {
            return Some(BrowserIntent::PromptRange);
        }
        KeyCode::Char('n') => return Some(BrowserIntent::PromptLimit),
        KeyCode::Char('e') => return Some(BrowserIntent::Export),
        KeyCode::Char('c') => return Some(BrowserIntent::ShowEmails),
        KeyCode::Char('m') => return Some(BrowserIntent::ShowMessage),
        KeyCode::Char('r') | KeyCode::F(5) => return Some(BrowserIntent::Reload),
        _ => {}
    }
    None
}

/// Draw one frame; returns how many table rows fit.
fn draw(f: &mut Frame, view: &BrowserView<'_>, cursor: &BrowserCursor) -> usize {
    let chunks = split_vertical(
        f.size(),
        &[
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(2),
        ],
    );

    draw_header(f, chunks[0], view);

    let body = split_horizontal(
        chunks[1],
        &[Constraint::Percentage(30), Constraint::Percentage(70)],
    );
    draw_lists(f, body[0], view, cursor);
    let capacity = draw_table(f, body[1], view, cursor);

    draw_footer(f, chunks[2], view);
    capacity
}

fn draw_header(f: &mut Frame, area: Rect, view: &BrowserView<'_>) {
    let mut title = format!("Help Break the Blackout in Iran — {}", view.sheet.display_name);
    if view.flag {
        title.push_str("  🦁☀");
    }

    let emails = if view.sheet.email_columns.is_empty() {
        "None".to_string()
    } else {
        view.sheet.email_columns.join(", ")
    };
    let caption = format!(
        "{} • Rows: {} | Email columns: {} ({} addresses) • Source: {}",
        if view.sheet.description.is_empty() {
            view.sheet.key.as_str()
        } else {
            view.sheet.description.as_str()
        },
        view.total_rows,
        emails,
        view.email_count,
        view.source_label
    );

    let lines = vec![
        header_line(title),
        Line::from(secondary_span(caption)),
        Line::from(filter_summary(view)),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn filter_summary(view: &BrowserView<'_>) -> String {
    let mut parts: Vec<String> = view
        .filter_choices
        .iter()
        .enumerate()
        .map(|(i, (column, _))| {
            let current = view
                .view
                .filters
                .accepted(column)
                .map(|values| values.iter().cloned().collect::<Vec<_>>().join(" | "))
                .unwrap_or_else(|| "All".to_string());
            format!("[{}] {}: {}", i + 1, column, current)
        })
        .collect();

    if let Some(keyword) = &view.view.keyword {
        parts.push(format!("Search: \"{keyword}\""));
    }
    if let Some(range) = &view.view.range {
        parts.push(format!("{}: {}–{}", range.column, range.min, range.max));
    }
    if view.view.limit > 0 {
        parts.push(format!("Limit: {}", view.view.limit));
    }

    if parts.is_empty() {
        "Filters: none".to_string()
    } else {
        format!("Filters: {}", parts.join(" • "))
    }
}

fn draw_lists(f: &mut Frame, area: Rect, view: &BrowserView<'_>, cursor: &BrowserCursor) {
    let mut items = Vec::new();
    let mut last_category = None;
    for (i, summary) in view.summaries.iter().enumerate() {
        if last_category != Some(summary.category) {
            items.push(ListItem::new(header_line(summary.category.label().to_uppercase())));
            last_category = Some(summary.category);
        }

        let marker = if summary.key == view.sheet.key { "●" } else { " " };
        let mut label = format!("{marker} {}", summary.display_name);
        if !summary.available {
            label.push_str(" (missing)");
        }
        let mut style = if summary.available {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if i == cursor.list_index {
            style = if cursor.focus == Focus::Lists {
                style.add_modifier(Modifier::REVERSED)
            } else {
                selection_style()
            };
        }
        items.push(ListItem::new(label).style(style));
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(pane_border(cursor.focus == Focus::Lists))
            .title("Lists"),
    );
    f.render_widget(list, area);
}

fn draw_table(f: &mut Frame, area: Rect, view: &BrowserView<'_>, cursor: &BrowserCursor) -> usize {
    let capacity = (area.height.saturating_sub(3) as usize).max(1);

    let Some(table) = view.table else {
        let message = Paragraph::new("This list could not be loaded. See the status line.")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(pane_border(cursor.focus == Focus::Table))
                    .title("Filtered table"),
            );
        f.render_widget(message, area);
        return capacity;
    };

    let selected = (cursor.focus == Focus::Table).then_some(cursor.row);
    let (header, rows) = table_rows(table, cursor.offset, capacity, selected);
    let title = format!("Filtered table ({} of {} rows)", table.len(), view.total_rows);
    let widget = build_table(rows, header, column_widths(table), title.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(pane_border(cursor.focus == Focus::Table))
            .title(title),
    );
    f.render_widget(widget, area);
    capacity
}

fn draw_footer(f: &mut Frame, area: Rect, view: &BrowserView<'_>) {
    let rows = split_vertical(area, &[Constraint::Length(1), Constraint::Length(1)]);

    if let Some(status) = view.status {
        let style = if status.is_error {
            Style::default().fg(ERROR)
        } else {
            Style::default().fg(Color::Green)
        };
        f.render_widget(Paragraph::new(status.text.as_str()).style(style), rows[0]);
    }

    let mut help = String::from(
        "Tab pane • ↑/↓ move • Enter open • 1-9 filters • / search • n limit • x clear",
    );
    if view.sheet.range_column.is_some() {
        help.push_str(" • f range");
    }
    help.push_str(" • e export • c emails • m message • r reload • q quit");
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::Gray)),
        rows[1],
    );
}
