pub mod bootstrap;
pub mod commands;
pub mod controller;
pub mod selector;
pub mod state;
pub mod watcher;

pub use bootstrap::run;
pub use commands::{
    collect_emails, export_list, list_overview, save_emails, view_from_args, ExportRequest,
    ExportSummary,
};
pub use controller::AppController;
pub use selector::{ListSelector, ListSummary};
pub use state::{BrowseAction, BrowseState};
pub use watcher::WorkbookWatcher;
