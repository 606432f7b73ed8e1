pub mod browser;
pub mod prompt;
pub mod text_view;

pub use browser::{run_browser, BrowserCursor, BrowserIntent, BrowserView, Focus, StatusLine};
pub use prompt::run_prompt;
pub use text_view::run_text_view;
