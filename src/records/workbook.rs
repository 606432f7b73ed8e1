use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use log::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};

use super::{list_from_range, normalize_list, ContactList};

/// Anything that can hand out worksheet ranges by name.
pub trait SheetSource {
    fn sheet_names(&self) -> Vec<String>;
    fn read_sheet(&mut self, name: &str) -> Result<Range<Data>>;
}

/// Spreadsheet file on disk (xlsx, xlsm, xls, ods), read through calamine.
pub struct CalamineSource {
    sheets: Sheets<BufReader<File>>,
}

impl CalamineSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AppError::missing_file(path));
        }
        let sheets = open_workbook_auto(path)?;
        Ok(Self { sheets })
    }
}

impl SheetSource for CalamineSource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Range<Data>> {
        Ok(self.sheets.worksheet_range(name)?)
    }
}

/// Every configured sheet found in the source, parsed and normalised.
#[derive(Debug, Clone)]
pub struct Workbook {
    path: Option<PathBuf>,
    lists: HashMap<String, ContactList>,
}

impl Workbook {
    /// One-shot read of the workbook at `path`. A missing file is `AppError::MissingFile`.
    pub fn open<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let mut source = CalamineSource::open(path)?;
        let mut workbook = Self::load(&mut source, config)?;
        workbook.path = Some(path.to_path_buf());
        info!(
            "loaded {} contact lists from {}",
            workbook.lists.len(),
            path.display()
        );
        Ok(workbook)
    }

    /// Read the configured sheets from any source. Unconfigured sheets are ignored and
    /// configured sheets absent from the source are simply not loaded.
    pub fn load<S: SheetSource>(source: &mut S, config: &Config) -> Result<Self> {
        let available = source.sheet_names();
        let mut lists = HashMap::new();

        for sheet in &config.sheets {
            if !available.iter().any(|name| name == &sheet.key) {
                warn!("sheet `{}` not found in workbook", sheet.key);
                continue;
            }
            let range = source.read_sheet(&sheet.key)?;
            let mut list = list_from_range(&sheet.key, &range);
            normalize_list(&mut list, sheet);
            debug!(
                "sheet `{}`: {} rows, {} columns",
                sheet.key,
                list.len(),
                list.columns().len()
            );
            lists.insert(sheet.key.clone(), list);
        }

        for name in &available {
            if config.sheet(name).is_none() {
                debug!("ignoring unconfigured sheet `{name}`");
            }
        }

        Ok(Self { path: None, lists })
    }

    pub fn from_lists(lists: Vec<ContactList>) -> Self {
        Self {
            path: None,
            lists: lists
                .into_iter()
                .map(|list| (list.name().to_string(), list))
                .collect(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lists.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn list(&self, key: &str) -> Result<&ContactList> {
        self.lists.get(key).ok_or_else(|| {
            AppError::invalid_selection(format!("Sheet '{key}' not found in workbook."))
        })
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;

    /// In-memory sheet source for tests.
    pub struct MemorySource {
        pub sheets: Vec<(String, Range<Data>)>,
    }

    impl MemorySource {
        pub fn new() -> Self {
            Self { sheets: Vec::new() }
        }

        pub fn sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
            let height = rows.len().max(1) as u32;
            let width = rows.iter().map(|row| row.len()).max().unwrap_or(1).max(1) as u32;
            let mut range = Range::new((0, 0), (height - 1, width - 1));
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    let cell = match value.parse::<f64>() {
                        Ok(number) => Data::Float(number),
                        Err(_) if value.is_empty() => Data::Empty,
                        Err(_) => Data::String(value.to_string()),
                    };
                    range.set_value((r as u32, c as u32), cell);
                }
            }
            self.sheets.push((name.to_string(), range));
            self
        }
    }

    impl SheetSource for MemorySource {
        fn sheet_names(&self) -> Vec<String> {
            self.sheets.iter().map(|(name, _)| name.clone()).collect()
        }

        fn read_sheet(&mut self, name: &str) -> Result<Range<Data>> {
            self.sheets
                .iter()
                .find(|(sheet, _)| sheet == name)
                .map(|(_, range)| range.clone())
                .ok_or_else(|| AppError::message(format!("no sheet {name}")))
        }
    }
}
