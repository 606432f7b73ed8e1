use log::info;

use crate::app::controller::AppController;
use crate::config::Config;
use crate::error::Result;

/// Entry point used by `main` to start the interactive browser.
pub fn run(config: Config) -> Result<()> {
    info!(
        "starting browser on {} ({} lists configured)",
        config.workbook_path.display(),
        config.sheets.len()
    );
    let controller = AppController::new(config)?;
    controller.run()
}
