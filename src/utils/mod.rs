pub mod file;
pub mod text;
pub mod time;

pub use file::{emails_file_path, export_file_path};
pub use text::sanitize_file_stem;
pub use time::{current_human_timestamp, export_timestamp_slug};
