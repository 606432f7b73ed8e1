pub mod components;
pub mod screens;
pub mod styles;

pub use components::TerminalGuard;
pub use screens::{
    run_browser, run_prompt, run_text_view, BrowserCursor, BrowserIntent, BrowserView, StatusLine,
};
