use crate::config::{Config, SheetConfig};
use crate::error::{AppError, Result};
use crate::messages::Language;
use crate::records::{
    apply_filters, select_options, ContactList, NumericRange, ViewOptions, Workbook,
};

/// User interactions that change what is visible.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseAction {
    SelectSheet(String),
    SetFilter { column: String, value: Option<String> },
    /// Step a select filter: All → first option → ... → last option → All.
    CycleFilter { column: String, options: Vec<String> },
    ClearFilters,
    SetKeyword(Option<String>),
    SetRange(Option<NumericRange>),
    SetLimit(usize),
    ToggleLanguage,
}

/// Browsing session state. `apply` is pure: it never touches the workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseState {
    sheet: String,
    view: ViewOptions,
    language: Language,
}

impl BrowseState {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            view: ViewOptions::default(),
            language: Language::default(),
        }
    }

    pub fn initial(config: &Config) -> Result<Self> {
        config
            .default_sheet()
            .map(Self::new)
            .ok_or_else(|| AppError::message("No contact lists configured."))
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn view(&self) -> &ViewOptions {
        &self.view
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn apply(mut self, action: BrowseAction) -> Self {
        match action {
            BrowseAction::SelectSheet(sheet) => {
                if sheet != self.sheet {
                    self.sheet = sheet;
                    self.view = ViewOptions::default();
                }
            }
            BrowseAction::SetFilter { column, value } => match value {
                Some(value) => self.view.filters.set(column, value),
                None => self.view.filters.clear(&column),
            },
            BrowseAction::CycleFilter { column, options } => {
                let current = self
                    .view
                    .filters
                    .accepted(&column)
                    .and_then(|values| values.iter().next().cloned());
                let next = match current {
                    None => options.first().cloned(),
                    Some(value) => options
                        .iter()
                        .position(|option| option == &value)
                        .and_then(|idx| options.get(idx + 1).cloned()),
                };
                match next {
                    Some(value) => self.view.filters.set(column, value),
                    None => self.view.filters.clear(&column),
                }
            }
            BrowseAction::ClearFilters => {
                self.view = ViewOptions::default();
            }
            BrowseAction::SetKeyword(keyword) => {
                self.view.keyword = keyword.filter(|kw| !kw.trim().is_empty());
            }
            BrowseAction::SetRange(range) => {
                self.view.range = range;
            }
            BrowseAction::SetLimit(limit) => {
                self.view.limit = limit;
            }
            BrowseAction::ToggleLanguage => {
                self.language = self.language.toggle();
            }
        }
        self
    }

    /// Rows of the selected sheet that pass the active filters (all columns kept).
    pub fn visible(&self, workbook: &Workbook) -> Result<ContactList> {
        let list = workbook.list(&self.sheet)?;
        apply_filters(list, &self.view)
    }

    /// `visible` restricted to the sheet's display columns.
    pub fn visible_display(&self, workbook: &Workbook, sheet: &SheetConfig) -> Result<ContactList> {
        Ok(self.visible(workbook)?.project(&sheet.display_columns))
    }

    /// Filter columns configured for the sheet that exist in the loaded list, with options.
    pub fn filter_choices(
        &self,
        workbook: &Workbook,
        sheet: &SheetConfig,
    ) -> Vec<(String, Vec<String>)> {
        let Ok(list) = workbook.list(&self.sheet) else {
            return Vec::new();
        };
        sheet
            .filter_columns
            .iter()
            .filter(|column| list.has_column(column))
            .map(|column| (column.clone(), select_options(list, column)))
            .filter(|(_, options)| !options.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::{list, meps};

    fn workbook() -> Workbook {
        Workbook::from_lists(vec![
            meps(),
            list(
                "Top_200_X",
                &["Name", "Followers", "Category"],
                &[
                    &["a", "100", "Media"],
                    &["b", "2000", "Politics"],
                    &["c", "", "Media"],
                ],
            ),
        ])
    }

    #[test]
    fn starts_on_first_configured_sheet() {
        let state = BrowseState::initial(&Config::builtin()).expect("initial");
        assert_eq!(state.sheet(), "EU_MEPs_All_2024_2029");
        assert_eq!(state.language(), Language::English);
    }

    #[test]
    fn visible_rows_follow_filters() {
        let workbook = workbook();
        let state = BrowseState::new("EU_MEPs_All_2024_2029").apply(BrowseAction::SetFilter {
            column: "Country".to_string(),
            value: Some("Sweden".to_string()),
        });
        assert_eq!(state.visible(&workbook).expect("visible").len(), 3);

        let state = state.apply(BrowseAction::SetFilter {
            column: "Country".to_string(),
            value: None,
        });
        assert_eq!(state.visible(&workbook).expect("visible").len(), 5);
    }

    #[test]
    fn cycle_filter_wraps_back_to_all() {
        let options = vec!["France".to_string(), "Sweden".to_string()];
        let cycle = BrowseAction::CycleFilter {
            column: "Country".to_string(),
            options,
        };
        let state = BrowseState::new("EU_MEPs_All_2024_2029");

        let state = state.apply(cycle.clone());
        assert!(state.view().filters.accepted("Country").unwrap().contains("France"));
        let state = state.apply(cycle.clone());
        assert!(state.view().filters.accepted("Country").unwrap().contains("Sweden"));
        let state = state.apply(cycle);
        assert!(state.view().filters.is_empty());
    }

    #[test]
    fn selecting_another_sheet_resets_view() {
        let state = BrowseState::new("EU_MEPs_All_2024_2029")
            .apply(BrowseAction::SetKeyword(Some("berg".to_string())))
            .apply(BrowseAction::SetLimit(2))
            .apply(BrowseAction::ToggleLanguage)
            .apply(BrowseAction::SelectSheet("Top_200_X".to_string()));

        assert_eq!(state.sheet(), "Top_200_X");
        assert_eq!(state.view(), &ViewOptions::default());
        assert_eq!(state.language(), Language::Swedish);
    }

    #[test]
    fn range_and_limit_compose() {
        let workbook = workbook();
        let state = BrowseState::new("Top_200_X")
            .apply(BrowseAction::SetRange(Some(NumericRange::new(
                "Followers",
                0.0,
                1000.0,
            ))))
            .apply(BrowseAction::SetLimit(1));
        let visible = state.visible(&workbook).expect("visible");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.value(0, "Name"), Some("a"));
    }

    #[test]
    fn blank_keyword_clears_search() {
        let state =
            BrowseState::new("Top_200_X").apply(BrowseAction::SetKeyword(Some("  ".into())));
        assert_eq!(state.view().keyword, None);
    }

    #[test]
    fn filter_choices_skip_missing_columns() {
        let config = Config::builtin();
        let workbook = workbook();
        let state = BrowseState::new("Top_200_X");
        let sheet = config.sheet("Top_200_X").expect("x sheet");

        let choices = state.filter_choices(&workbook, sheet);
        assert_eq!(
            choices,
            vec![(
                "Category".to_string(),
                vec!["Media".to_string(), "Politics".to_string()]
            )]
        );
    }

    #[test]
    fn visible_on_absent_sheet_is_invalid_selection() {
        let state = BrowseState::new("Top_100_TikTok");
        let err = state.visible(&workbook()).expect_err("absent sheet");
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }
}
