use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "contact-desk")]
#[command(about = "Browse, filter and export outreach contact lists from a workbook")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Workbook with one sheet per contact list
    #[arg(short, long, global = true)]
    pub workbook: Option<PathBuf>,

    /// JSON file overriding the built-in sheet configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Decorative flag image shown in the header when present
    #[arg(long, global = true)]
    pub flag: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the interactive browser (default)
    Browse,

    /// Show configured lists grouped by category
    Lists,

    /// Export the filtered rows of a list to CSV
    Export {
        /// Category (Europe, Sweden, International) or sheet name
        #[arg(short, long)]
        list: String,

        /// Keep rows where COLUMN equals VALUE; repeat to combine
        #[arg(short, long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,

        /// Case-insensitive keyword matched against every column
        #[arg(short, long)]
        search: Option<String>,

        /// Keep at most N rows (0 = no limit)
        #[arg(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Export every column instead of the display columns
        #[arg(long)]
        all_columns: bool,

        /// Output file; defaults to exports/<sheet>_<timestamp>.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the unique e-mail addresses of a list
    Emails {
        #[arg(short, long)]
        list: String,

        #[arg(short, long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,

        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print the outreach message
    Message {
        /// en or sv
        #[arg(long, default_value = "en")]
        lang: String,
    },
}
