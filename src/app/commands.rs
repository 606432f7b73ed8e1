use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::selector::ListSelector;
use crate::config::{Config, SheetConfig};
use crate::error::{Context, Result};
use crate::records::{
    apply_filters, extract_emails, save_csv, ContactList, FilterSpec, ViewOptions, Workbook,
};
use crate::utils::{emails_file_path, export_file_path, export_timestamp_slug};

/// Where an export landed and how many rows it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Non-interactive export, as driven by the `export` subcommand.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub list: String,
    pub filters: Vec<String>,
    pub search: Option<String>,
    pub limit: usize,
    pub all_columns: bool,
    pub output: Option<PathBuf>,
}

/// Build view options from command-line pieces (`COL=VALUE` filters, keyword, limit).
pub fn view_from_args(
    filters: &[String],
    search: Option<&str>,
    limit: usize,
) -> Result<ViewOptions> {
    Ok(ViewOptions {
        filters: FilterSpec::from_pairs(filters)?,
        keyword: search
            .map(str::trim)
            .filter(|kw| !kw.is_empty())
            .map(str::to_string),
        range: None,
        limit,
    })
}

/// The filtered rows of a list identified by category or sheet key.
pub fn filtered_list<'a>(
    config: &'a Config,
    workbook: &'a Workbook,
    identifier: &str,
    view: &ViewOptions,
) -> Result<(&'a SheetConfig, ContactList)> {
    let selector = ListSelector::new(config, workbook);
    let sheet = selector.resolve(identifier)?;
    let list = selector.select_sheet(&sheet.key)?;
    Ok((sheet, apply_filters(list, view)?))
}

/// Write `list` to `<exports_dir>/<sheet>_<timestamp>.csv`.
pub fn write_export(
    config: &Config,
    sheet: &SheetConfig,
    list: &ContactList,
) -> Result<ExportSummary> {
    let path = export_file_path(&config.exports_dir, &sheet.key, &export_timestamp_slug());
    write_export_to(list, path)
}

pub fn write_export_to(list: &ContactList, path: impl AsRef<Path>) -> Result<ExportSummary> {
    let path = path.as_ref();
    save_csv(list, path)?;
    info!("exported {} rows to {}", list.len(), path.display());
    Ok(ExportSummary {
        path: path.to_path_buf(),
        rows: list.len(),
    })
}

pub fn export_list(
    config: &Config,
    workbook: &Workbook,
    request: &ExportRequest,
) -> Result<ExportSummary> {
    let view = view_from_args(&request.filters, request.search.as_deref(), request.limit)?;
    let (sheet, rows) = filtered_list(config, workbook, &request.list, &view)?;
    let rows = if request.all_columns {
        rows
    } else {
        rows.project(&sheet.display_columns)
    };

    match &request.output {
        Some(path) => write_export_to(&rows, path),
        None => write_export(config, sheet, &rows),
    }
}

/// Unique addresses from the list's configured e-mail columns after filtering.
pub fn collect_emails(
    config: &Config,
    workbook: &Workbook,
    identifier: &str,
    view: &ViewOptions,
) -> Result<Vec<String>> {
    let (sheet, rows) = filtered_list(config, workbook, identifier, view)?;
    Ok(extract_emails(&rows, &sheet.email_columns))
}

/// Save one address per line next to the CSV exports.
pub fn save_emails(config: &Config, sheet: &SheetConfig, emails: &[String]) -> Result<PathBuf> {
    let path = emails_file_path(&config.exports_dir, &sheet.key, &export_timestamp_slug());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut body = emails.join("\n");
    body.push('\n');
    fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("saved {} addresses to {}", emails.len(), path.display());
    Ok(path)
}

/// One line per configured list for the `lists` subcommand.
pub fn list_overview(config: &Config, workbook: Option<&Workbook>) -> Vec<String> {
    let mut lines = Vec::new();
    for group in &config.groups {
        lines.push(format!("{}:", group.category));
        for key in &group.sheets {
            let Some(sheet) = config.sheet(key) else {
                continue;
            };
            let rows = match workbook.map(|wb| wb.list(key)) {
                Some(Ok(list)) => format!("{} rows", list.len()),
                Some(Err(_)) => "missing".to_string(),
                None => "not loaded".to_string(),
            };
            lines.push(format!("  {:<28} {} ({rows})", sheet.key, sheet.display_name));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::meps;
    use crate::records::parse_csv;

    fn setup(dir: &Path) -> (Config, Workbook) {
        let mut config = Config::builtin();
        config.exports_dir = dir.join("exports");
        (config, Workbook::from_lists(vec![meps()]))
    }

    #[test]
    fn export_by_category_writes_display_columns_for_matching_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (config, workbook) = setup(dir.path());
        let request = ExportRequest {
            list: "Europe".to_string(),
            filters: vec!["Country=Sweden".to_string()],
            ..ExportRequest::default()
        };

        let summary = export_list(&config, &workbook, &request).expect("export");
        assert_eq!(summary.rows, 3);
        assert!(summary.path.starts_with(dir.path().join("exports")));
        let name = summary
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .expect("file name");
        assert!(name.starts_with("EU_MEPs_All_2024_2029_"), "{name}");
        assert!(name.ends_with(".csv"), "{name}");

        let parsed = parse_csv("check", fs::File::open(&summary.path).expect("open"))
            .expect("parse export");
        assert_eq!(
            parsed.columns(),
            &[
                "Name",
                "Profile_URL",
                "National_party",
                "Email (generated guess)",
            ]
        );
        let names: Vec<_> = (0..parsed.len())
            .filter_map(|i| parsed.value(i, "Name"))
            .collect();
        assert_eq!(names, vec!["Alice Berg", "Erik Lund", "Lars Holm"]);
    }

    #[test]
    fn export_all_columns_to_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (config, workbook) = setup(dir.path());
        let output = dir.path().join("out").join("all.csv");
        let request = ExportRequest {
            list: "EU_MEPs_All_2024_2029".to_string(),
            all_columns: true,
            output: Some(output.clone()),
            ..ExportRequest::default()
        };

        let summary = export_list(&config, &workbook, &request).expect("export");
        assert_eq!(summary.path, output);
        let parsed = parse_csv("check", fs::File::open(&output).expect("open")).expect("parse");
        assert_eq!(parsed.columns(), meps().columns());
        assert_eq!(parsed.len(), 5);
    }

    #[test]
    fn unknown_list_or_filter_column_is_invalid_selection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (config, workbook) = setup(dir.path());

        let err = export_list(
            &config,
            &workbook,
            &ExportRequest {
                list: "Atlantis".to_string(),
                ..ExportRequest::default()
            },
        )
        .expect_err("unknown list");
        assert!(err.is_user_facing(), "{err}");

        let err = export_list(
            &config,
            &workbook,
            &ExportRequest {
                list: "Europe".to_string(),
                filters: vec!["Planet=Mars".to_string()],
                ..ExportRequest::default()
            },
        )
        .expect_err("unknown column");
        assert!(err.is_user_facing(), "{err}");
    }

    #[test]
    fn emails_follow_filters_and_save_one_per_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (config, workbook) = setup(dir.path());
        let view = view_from_args(&[], Some("  lund "), 0).expect("view");

        let emails = collect_emails(&config, &workbook, "Europe", &view).expect("emails");
        assert_eq!(emails, vec!["erik.lund@ep.eu".to_string()]);

        let sheet = config.sheet("EU_MEPs_All_2024_2029").expect("sheet");
        let path = save_emails(&config, sheet, &emails).expect("save");
        assert_eq!(fs::read_to_string(path).expect("read"), "erik.lund@ep.eu\n");
    }

    #[test]
    fn overview_marks_missing_sheets() {
        let config = Config::builtin();
        let workbook = Workbook::from_lists(vec![meps()]);
        let lines = list_overview(&config, Some(&workbook));
        assert_eq!(lines[0], "Europe:");
        assert!(lines[1].contains("EU_MEPs_All_2024_2029") && lines[1].ends_with("(5 rows)"));
        assert!(lines.iter().any(|line| line.contains("Top_200_X") && line.ends_with("(missing)")));
    }
}
