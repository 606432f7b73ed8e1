pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod messages;
pub mod records;
pub mod ui;
pub mod utils;

pub use error::{AppError, Result};
