use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::error::Result;
use crate::ui::components::utils::split_vertical;
use crate::ui::components::TerminalGuard;
use crate::ui::styles::header_line;

/// Scrollable read-only text (email list, message template).
///
/// `actions` are extra single-key commands shown in the footer. Returns the key that
/// closed the view, or `None` for Esc/q.
pub fn run_text_view(
    guard: &mut TerminalGuard,
    title: &str,
    body: &str,
    actions: &[(char, &str)],
) -> Result<Option<char>> {
    let total_lines = body.lines().count();
    let mut scroll: usize = 0;
    let mut page: usize = 1;

    let mut footer = String::from("↑/↓ scroll • PgUp/PgDn page");
    for (key, label) in actions {
        footer.push_str(&format!(" • {key} {label}"));
    }
    footer.push_str(" • Esc back");

    loop {
        guard.draw(|f| {
            let chunks = split_vertical(
                f.size(),
                &[
                    Constraint::Length(1),
                    Constraint::Min(3),
                    Constraint::Length(1),
                ],
            );
            f.render_widget(Paragraph::new(header_line(title.to_string())), chunks[0]);

            page = (chunks[1].height.saturating_sub(2) as usize).max(1);
            let offset = u16::try_from(scroll).unwrap_or(u16::MAX);
            f.render_widget(
                Paragraph::new(body)
                    .block(Block::default().borders(Borders::ALL))
                    .wrap(Wrap { trim: false })
                    .scroll((offset, 0)),
                chunks[1],
            );

            f.render_widget(
                Paragraph::new(footer.as_str()).style(Style::default().fg(Color::Gray)),
                chunks[2],
            );
        })?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                let last = total_lines.saturating_sub(1);
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(None),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(None);
                    }
                    KeyCode::Up | KeyCode::Char('k') => scroll = scroll.saturating_sub(1),
                    KeyCode::Down | KeyCode::Char('j') => scroll = (scroll + 1).min(last),
                    KeyCode::PageUp => scroll = scroll.saturating_sub(page),
                    KeyCode::PageDown => scroll = (scroll + page).min(last),
                    KeyCode::Home => scroll = 0,
                    KeyCode::Char(c) if actions.iter().any(|(key, _)| *key == c) => {
                        return Ok(Some(c));
                    }
                    _ => {}
                }
            }
        }
    }
}
