use crate::config::{Category, Config, SheetConfig};
use crate::error::{AppError, Result};
use crate::records::{ContactList, Workbook};

/// Lightweight summary used by the list picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListSummary {
    pub category: Category,
    pub key: String,
    pub display_name: String,
    pub available: bool,
}

/// Facade over `Config` + `Workbook` that resolves categories and sheet keys to lists.
pub struct ListSelector<'a> {
    config: &'a Config,
    workbook: &'a Workbook,
}

impl<'a> ListSelector<'a> {
    pub fn new(config: &'a Config, workbook: &'a Workbook) -> Self {
        Self { config, workbook }
    }

    /// Every configured list in picker order, flagged with whether the workbook has it.
    pub fn summaries(&self) -> Vec<ListSummary> {
        self.config
            .groups
            .iter()
            .flat_map(|group| {
                group.sheets.iter().filter_map(move |key| {
                    self.config.sheet(key).map(|sheet| ListSummary {
                        category: group.category,
                        key: sheet.key.clone(),
                        display_name: sheet.display_name.clone(),
                        available: self.workbook.contains(key),
                    })
                })
            })
            .collect()
    }

    pub fn sheets(&self, category: Category) -> Result<&'a [String]> {
        self.config
            .group(category)
            .map(|group| group.sheets.as_slice())
            .ok_or_else(|| {
                AppError::invalid_selection(format!("No lists configured for {category}."))
            })
    }

    /// Parse a category identifier and return its primary list.
    pub fn select(&self, identifier: &str) -> Result<&'a ContactList> {
        let category: Category = identifier.parse()?;
        self.select_category(category)
    }

    pub fn select_category(&self, category: Category) -> Result<&'a ContactList> {
        let key = self.sheets(category)?.first().ok_or_else(|| {
            AppError::invalid_selection(format!("No lists configured for {category}."))
        })?;
        self.select_sheet(key)
    }

    pub fn select_sheet(&self, key: &str) -> Result<&'a ContactList> {
        if self.config.sheet(key).is_none() {
            return Err(AppError::invalid_selection(format!("Unknown list `{key}`.")));
        }
        self.workbook.list(key)
    }

    /// Accept either a category (`Europe`) or a sheet key (`Top_200_X`).
    pub fn resolve(&self, identifier: &str) -> Result<&'a SheetConfig> {
        let trimmed = identifier.trim();
        if let Some(sheet) = self.config.sheet(trimmed) {
            return Ok(sheet);
        }
        let category: Category = trimmed.parse().map_err(|_| {
            AppError::invalid_selection(format!(
                "Unknown list `{trimmed}`. Use a category (Europe, Sweden, International) or a sheet name."
            ))
        })?;
        let key = self.sheets(category)?.first().ok_or_else(|| {
            AppError::invalid_selection(format!("No lists configured for {category}."))
        })?;
        self.config
            .sheet(key)
            .ok_or_else(|| AppError::invalid_selection(format!("Unknown list `{key}`.")))
    }
}
