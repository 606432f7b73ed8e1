use log::{debug, info, warn};

use crate::app::commands::{save_emails, write_export};
use crate::app::selector::ListSelector;
use crate::app::state::{BrowseAction, BrowseState};
use crate::app::watcher::WorkbookWatcher;
use crate::assets::{probe_flag, FlagAsset};
use crate::config::{Config, SheetConfig};
use crate::error::{AppError, Result};
use crate::messages::message_template;
use crate::records::{extract_emails, value_bounds, NumericRange, Workbook};
use crate::ui::{
    run_browser, run_prompt, run_text_view, BrowserCursor, BrowserIntent, BrowserView,
    StatusLine, TerminalGuard,
};
use crate::utils::current_human_timestamp;

/// Owns the browsing session: configuration, loaded workbook, browse state and the TUI.
pub struct AppController {
    config: Config,
    workbook: Option<Workbook>,
    state: BrowseState,
    status: Option<StatusLine>,
    watcher: Option<WorkbookWatcher>,
    flag: Option<FlagAsset>,
}

impl AppController {
    pub fn new(config: Config) -> Result<Self> {
        let state = BrowseState::initial(&config)?;

        let flag = match probe_flag(&config.flag_path) {
            Ok(flag) => Some(flag),
            Err(err) => {
                debug!("flag image unavailable: {err}");
                None
            }
        };

        let watcher = match WorkbookWatcher::start(&config.workbook_path) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                warn!("not watching workbook for changes: {err}");
                None
            }
        };

        let mut controller = Self {
            config,
            workbook: None,
            state,
            status: None,
            watcher,
            flag,
        };
        controller.load_workbook();
        Ok(controller)
    }

    /// (Re)read the workbook. Failures land in the status line and leave the session usable.
    fn load_workbook(&mut self) {
        match Workbook::open(&self.config.workbook_path, &self.config) {
            Ok(workbook) => {
                self.workbook = Some(workbook);
                self.status = None;
            }
            Err(err) => {
                warn!("workbook load failed: {err}");
                self.workbook = None;
                self.status = Some(StatusLine::error(if err.is_user_facing() {
                    err.to_string()
                } else {
                    format!("Failed to read workbook: {err}")
                }));
            }
        }
    }

    fn current_sheet(&self) -> Result<&SheetConfig> {
        self.config.sheet(self.state.sheet()).ok_or_else(|| {
            AppError::invalid_selection(format!("Unknown list `{}`.", self.state.sheet()))
        })
    }

    fn dispatch(&mut self, action: BrowseAction) {
        self.state = self.state.clone().apply(action);
    }

    pub fn run(mut self) -> Result<()> {
        let mut guard = TerminalGuard::new()?;
        let empty = Workbook::from_lists(Vec::new());
        let mut cursor = BrowserCursor::default();

        let summaries = ListSelector::new(&self.config, self.workbook.as_ref().unwrap_or(&empty))
            .summaries();
        cursor.list_index = summaries
            .iter()
            .position(|summary| summary.key == self.state.sheet())
            .unwrap_or(0);

        loop {
            let intent = {
                let workbook = self.workbook.as_ref().unwrap_or(&empty);
                let sheet = self.current_sheet()?;
                let summaries = ListSelector::new(&self.config, workbook).summaries();
                let choices = self.state.filter_choices(workbook, sheet);
                let total_rows = workbook
                    .list(self.state.sheet())
                    .map(|list| list.len())
                    .unwrap_or(0);

                let (table, view_error) = match self.state.visible_display(workbook, sheet) {
                    Ok(table) => (Some(table), None),
                    Err(err) => (None, Some(StatusLine::error(err.to_string()))),
                };
                let email_count = self
                    .state
                    .visible(workbook)
                    .map(|rows| extract_emails(&rows, &sheet.email_columns).len())
                    .unwrap_or(0);

                if let Some(table) = &table {
                    if cursor.row >= table.len() {
                        cursor.reset_rows();
                    }
                }

                let source_label = self.config.workbook_path.display().to_string();
                let status = self.status.as_ref().or(view_error.as_ref());
                let view = BrowserView {
                    summaries: &summaries,
                    sheet,
                    table: table.as_ref(),
                    total_rows,
                    filter_choices: &choices,
                    view: self.state.view(),
                    email_count,
                    status,
                    source_label: &source_label,
                    flag: self.flag.is_some(),
                };
                let watcher = self.watcher.as_ref();
                let changed = || watcher.map(WorkbookWatcher::poll_changed).unwrap_or(false);

                let intent = run_browser(&mut guard, &view, &mut cursor, &changed)?;
                if let BrowserIntent::CycleFilter(index) = intent {
                    match choices.get(index) {
                        Some((column, options)) => {
                            BrowserIntent::Browse(BrowseAction::CycleFilter {
                                column: column.clone(),
                                options: options.clone(),
                            })
                        }
                        None => continue,
                    }
                } else {
                    intent
                }
            };

            match intent {
                BrowserIntent::Quit => break,
                BrowserIntent::Browse(action) => {
                    if matches!(action, BrowseAction::SelectSheet(_)) {
                        self.status = None;
                    }
                    cursor.reset_rows();
                    self.dispatch(action);
                }
                BrowserIntent::CycleFilter(_) => {}
                BrowserIntent::PromptKeyword => self.prompt_keyword(&mut guard)?,
                BrowserIntent::PromptRange => self.prompt_range(&mut guard, &empty)?,
                BrowserIntent::PromptLimit => self.prompt_limit(&mut guard)?,
                BrowserIntent::Export => self.export_visible(&empty),
                BrowserIntent::ShowEmails => self.show_emails(&mut guard, &empty)?,
                BrowserIntent::ShowMessage => self.show_message(&mut guard)?,
                BrowserIntent::Reload => {
                    self.load_workbook();
                    cursor.reset_rows();
                    if self.workbook.is_some() {
                        info!("workbook reloaded");
                        self.status = Some(StatusLine::info(format!(
                            "Workbook reloaded at {}",
                            current_human_timestamp()
                        )));
                    }
                }
            }
        }

        guard.restore()?;
        Ok(())
    }

    fn prompt_keyword(&mut self, guard: &mut TerminalGuard) -> Result<()> {
        let current = self.state.view().keyword.clone().unwrap_or_default();
        if let Some(input) = run_prompt(
            guard,
            "Search",
            "Case-insensitive match in any column. Leave empty to clear.",
            &current,
        )? {
            self.dispatch(BrowseAction::SetKeyword(Some(input)));
        }
        Ok(())
    }

    fn prompt_range(&mut self, guard: &mut TerminalGuard, empty: &Workbook) -> Result<()> {
        let sheet = self.current_sheet()?;
        let Some(column) = sheet.range_column.clone() else {
            return Ok(());
        };
        let workbook = self.workbook.as_ref().unwrap_or(empty);
        let list = workbook.list(&sheet.key).ok();
        if list.is_some_and(|list| !list.has_column(&column)) {
            self.status = Some(StatusLine::error(format!(
                "Column `{column}` is not in this sheet; range filter unavailable."
            )));
            return Ok(());
        }
        let hint = match list.and_then(|list| value_bounds(list, &column)) {
            Some((lo, hi)) => format!("Values span {lo}–{hi}. Enter MIN-MAX; empty clears."),
            None => "Enter MIN-MAX; empty clears.".to_string(),
        };
        let current = self
            .state
            .view()
            .range
            .as_ref()
            .map(|range| format!("{}-{}", range.min, range.max))
            .unwrap_or_default();

        let Some(input) = run_prompt(guard, &format!("{column} range"), &hint, &current)? else {
            return Ok(());
        };
        match parse_range(&input) {
            Ok(bounds) => {
                let range = bounds.map(|(min, max)| NumericRange::new(column, min, max));
                self.dispatch(BrowseAction::SetRange(range));
            }
            Err(err) => self.status = Some(StatusLine::error(err.to_string())),
        }
        Ok(())
    }

    fn prompt_limit(&mut self, guard: &mut TerminalGuard) -> Result<()> {
        let label = self.current_sheet()?.limit_label().to_string();
        let current = match self.state.view().limit {
            0 => String::new(),
            n => n.to_string(),
        };
        let Some(input) = run_prompt(guard, &label, "Whole number of rows.", &current)? else {
            return Ok(());
        };
        match parse_limit(&input) {
            Ok(limit) => self.dispatch(BrowseAction::SetLimit(limit)),
            Err(err) => self.status = Some(StatusLine::error(err.to_string())),
        }
        Ok(())
    }

    fn export_visible(&mut self, empty: &Workbook) {
        let workbook = self.workbook.as_ref().unwrap_or(empty);
        let result = self.current_sheet().and_then(|sheet| {
            let rows = self.state.visible_display(workbook, sheet)?;
            write_export(&self.config, sheet, &rows)
        });
        self.status = Some(match result {
            Ok(summary) => StatusLine::info(format!(
                "Saved {} rows to {}",
                summary.rows,
                summary.path.display()
            )),
            Err(err) => StatusLine::error(format!("Export failed: {err}")),
        });
    }

    fn show_emails(&mut self, guard: &mut TerminalGuard, empty: &Workbook) -> Result<()> {
        let workbook = self.workbook.as_ref().unwrap_or(empty);
        let sheet = self.current_sheet()?;
        if sheet.email_columns.is_empty() {
            self.status = Some(StatusLine::info("No email columns detected for this list."));
            return Ok(());
        }
        let emails = match self.state.visible(workbook) {
            Ok(rows) => extract_emails(&rows, &sheet.email_columns),
            Err(err) => {
                self.status = Some(StatusLine::error(err.to_string()));
                return Ok(());
            }
        };

        let body = if emails.is_empty() {
            "No email addresses in the visible rows.".to_string()
        } else {
            emails.join("\n")
        };
        let title = format!("{} email addresses ({})", emails.len(), sheet.display_name);
        let actions: &[(char, &str)] = if emails.is_empty() { &[] } else { &[('s', "save")] };

        if run_text_view(guard, &title, &body, actions)? == Some('s') {
            self.status = Some(match save_emails(&self.config, sheet, &emails) {
                Ok(path) => StatusLine::info(format!(
                    "Saved {} addresses to {}",
                    emails.len(),
                    path.display()
                )),
                Err(err) => StatusLine::error(format!("Saving addresses failed: {err}")),
            });
        }
        Ok(())
    }

    fn show_message(&mut self, guard: &mut TerminalGuard) -> Result<()> {
        loop {
            let language = self.state.language();
            let title = format!("Message ({language})");
            match run_text_view(
                guard,
                &title,
                message_template(language),
                &[('l', "switch language")],
            )? {
                Some('l') => self.dispatch(BrowseAction::ToggleLanguage),
                _ => return Ok(()),
            }
        }
    }
}

/// `MIN-MAX`, `MIN..MAX` or `MIN MAX`; empty input clears the range.
fn parse_range(input: &str) -> Result<Option<(f64, f64)>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let invalid = || {
        AppError::invalid_selection(format!("Range `{trimmed}` must look like MIN-MAX"))
    };
    let (lo, hi) = trimmed
        .split_once("..")
        .or_else(|| trimmed.split_once('-'))
        .or_else(|| trimmed.split_once(' '))
        .ok_or_else(invalid)?;
    let parse = |part: &str| -> Result<f64> {
        part.trim()
            .replace([',', ' '], "")
            .parse::<f64>()
            .map_err(|_| invalid())
    };
    let (min, max) = (parse(lo)?, parse(hi)?);
    if min > max {
        return Err(AppError::invalid_selection(format!(
            "Range minimum {min} is above maximum {max}"
        )));
    }
    Ok(Some((min, max)))
}

fn parse_limit(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<usize>().map_err(|_| {
        AppError::invalid_selection(format!("Limit `{trimmed}` must be a whole number"))
    })
}
