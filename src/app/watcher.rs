use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use log::warn;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{AppError, Result};

/// Watches the workbook's directory and reports when the workbook file itself changes.
pub struct WorkbookWatcher {
    _watcher: RecommendedWatcher,
    changes: Receiver<()>,
}

impl WorkbookWatcher {
    pub fn start(workbook: &Path) -> Result<Self> {
        let file_name = workbook
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| {
                AppError::message(format!("{} is not a file path", workbook.display()))
            })?;
        let dir = match workbook.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, changes) = mpsc::channel();
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event)
                    if is_relevant_event(&event.kind)
                        && touches_file(&event.paths, &file_name) =>
                {
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(err) => warn!("Workbook watch error: {err}"),
            })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            changes,
        })
    }

    /// Drain pending notifications; true when the workbook changed since the last poll.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(()) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return changed,
            }
        }
    }
}

fn touches_file(paths: &[PathBuf], file_name: &OsString) -> bool {
    paths
        .iter()
        .any(|path| path.file_name().map(|name| name == file_name).unwrap_or(false))
}

fn is_relevant_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_the_workbook_file() {
        let name = OsString::from("contacts.xlsx");
        assert!(touches_file(&[PathBuf::from("/data/contacts.xlsx")], &name));
        assert!(!touches_file(&[PathBuf::from("/data/other.xlsx")], &name));
        assert!(!touches_file(&[], &name));
    }

    #[test]
    fn ignores_access_events() {
        assert!(is_relevant_event(&EventKind::Modify(
            notify::event::ModifyKind::Any
        )));
        assert!(!is_relevant_event(&EventKind::Access(
            notify::event::AccessKind::Any
        )));
    }

    #[test]
    fn starts_on_existing_directory_and_reports_nothing_initially() {
        let dir = tempfile::tempdir().expect("tempdir");
        let watcher =
            WorkbookWatcher::start(&dir.path().join("contacts.xlsx")).expect("start watcher");
        assert!(!watcher.poll_changed());
    }
}
