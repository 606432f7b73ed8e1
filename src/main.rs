mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use contact_desk::app::{self, ExportRequest};
use contact_desk::config::Config;
use contact_desk::messages::{message_template, Language};
use contact_desk::records::Workbook;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => app::run(config)?,
        Commands::Lists => {
            let workbook = match Workbook::open(&config.workbook_path, &config) {
                Ok(workbook) => Some(workbook),
                Err(err) => {
                    eprintln!("{err}");
                    None
                }
            };
            for line in app::list_overview(&config, workbook.as_ref()) {
                println!("{line}");
            }
        }
        Commands::Export {
            list,
            filters,
            search,
            limit,
            all_columns,
            output,
        } => {
            let workbook = Workbook::open(&config.workbook_path, &config)?;
            let request = ExportRequest {
                list,
                filters,
                search,
                limit,
                all_columns,
                output,
            };
            let summary = app::export_list(&config, &workbook, &request)?;
            println!("Saved {} rows to {}", summary.rows, summary.path.display());
        }
        Commands::Emails {
            list,
            filters,
            search,
        } => {
            let workbook = Workbook::open(&config.workbook_path, &config)?;
            let view = app::view_from_args(&filters, search.as_deref(), 0)?;
            let emails = app::collect_emails(&config, &workbook, &list, &view)?;
            if emails.is_empty() {
                eprintln!("No email addresses found for {list}.");
            }
            for email in emails {
                println!("{email}");
            }
        }
        Commands::Message { lang } => {
            let language: Language = lang.parse()?;
            println!("{}", message_template(language));
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &cli.workbook {
        config.workbook_path = path.clone();
    }
    if let Some(path) = &cli.flag {
        config.flag_path = path.clone();
    }
    debug!(
        "workbook {}, exports in {}",
        config.workbook_path.display(),
        config.exports_dir.display()
    );
    Ok(config)
}
