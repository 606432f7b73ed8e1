use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::error::Result;
use crate::ui::components::utils::centered_rect;
use crate::ui::components::TerminalGuard;
use crate::ui::styles::{pane_border, secondary_span};

/// Single-line text input. `None` means the user cancelled with Esc.
pub fn run_prompt(
    guard: &mut TerminalGuard,
    title: &str,
    hint: &str,
    initial: &str,
) -> Result<Option<String>> {
    let mut input = initial.to_string();

    loop {
        guard.draw(|f| {
            let area = centered_rect(60, 30, f.size());
            f.render_widget(Clear, area);

            let lines = vec![
                Line::from(format!("{input}_")),
                Line::from(""),
                Line::from(secondary_span(hint.to_string())),
                Line::from(secondary_span("Enter apply • Esc cancel • Ctrl+U clear")),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(pane_border(true))
                .title(title.to_string());
            f.render_widget(
                Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
                area,
            );
        })?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Enter => return Ok(Some(input)),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(None);
                    }
                    KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        input.clear();
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(c) => input.push(c),
                    _ => {}
                }
            }
        }
    }
}
