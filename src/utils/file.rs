use std::path::{Path, PathBuf};

use super::text::sanitize_file_stem;

/// `<dir>/<sheet>_<stamp>.csv`; falls back to `contacts` when the sheet name has no usable
/// characters.
pub fn export_file_path(dir: impl AsRef<Path>, sheet: &str, stamp: &str) -> PathBuf {
    let stem = sanitize_file_stem(sheet).unwrap_or_else(|| "contacts".to_string());
    dir.as_ref().join(format!("{stem}_{stamp}.csv"))
}

/// Same naming scheme for saved e-mail lists, as plain text.
pub fn emails_file_path(dir: impl AsRef<Path>, sheet: &str, stamp: &str) -> PathBuf {
    let stem = sanitize_file_stem(sheet).unwrap_or_else(|| "contacts".to_string());
    dir.as_ref().join(format!("{stem}_emails_{stamp}.txt"))
}
