use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Decorative image shipped next to the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagAsset {
    pub path: PathBuf,
    pub size: u64,
}

/// Look for the decorative flag image. Absence is `MissingFile` and callers ignore it.
pub fn probe_flag<P: AsRef<Path>>(path: P) -> Result<FlagAsset> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(FlagAsset {
            path: path.to_path_buf(),
            size: meta.len(),
        }),
        Ok(_) => Err(AppError::missing_file(path)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::missing_file(path))
        }
        Err(err) => Err(err.into()),
    }
}
