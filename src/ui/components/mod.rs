pub mod table;
pub mod terminal;
pub mod utils;

pub use table::{build_table, column_widths, highlight_row, table_rows};
pub use terminal::TerminalGuard;
