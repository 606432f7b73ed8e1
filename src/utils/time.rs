use chrono::Local;

pub fn current_human_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Timestamp suffix for export file names, sortable and free of path separators.
pub fn export_timestamp_slug() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}
