use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

use crate::error::{AppError, Context, Result};

use super::{CategoryGroup, Config, SheetConfig};

/// Optional JSON overrides layered on top of the built-in configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    workbook: Option<String>,
    #[serde(default)]
    flag: Option<String>,
    #[serde(default)]
    exports_dir: Option<String>,
    #[serde(default)]
    sheets: Vec<SheetConfig>,
    #[serde(default)]
    groups: Option<Vec<CategoryGroup>>,
}

/// Read a JSON override file and merge it into `base`.
///
/// Sheets are merged by key: an entry with an existing key replaces it, new keys are
/// appended. Groups, when present, replace the base groups entirely. Relative paths are
/// resolved against the directory holding the override file.
pub fn load_config_file(path: &Path, base: Config) -> Result<Config> {
    if !path.exists() {
        return Err(AppError::missing_file(path));
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;
    let raw: RawConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config JSON at {}", path.display()))?;

    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let merged = merge(base, raw, root);
    debug!(
        "loaded config overrides from {} ({} sheets)",
        path.display(),
        merged.sheets.len()
    );
    Ok(merged)
}

fn merge(mut base: Config, raw: RawConfig, root: &Path) -> Config {
    if let Some(workbook) = raw.workbook {
        base.workbook_path = resolve(root, &workbook);
    }
    if let Some(flag) = raw.flag {
        base.flag_path = resolve(root, &flag);
    }
    if let Some(exports_dir) = raw.exports_dir {
        base.exports_dir = resolve(root, &exports_dir);
    }

    for sheet in raw.sheets {
        match base.sheets.iter_mut().find(|existing| existing.key == sheet.key) {
            Some(existing) => *existing = sheet,
            None => base.sheets.push(sheet),
        }
    }

    if let Some(groups) = raw.groups {
        base.groups = groups;
    }

    base
}

fn resolve(root: &Path, value: &str) -> PathBuf {
    let candidate = PathBuf::from(value.trim());
    if candidate.is_absolute() {
        candidate
    } else {
        root.join(candidate)
    }
}
