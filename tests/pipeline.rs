use std::fs;

use calamine::{Data, Range};
use contact_desk::app::{self, BrowseAction, BrowseState, ExportRequest, ListSelector};
use contact_desk::config::{Category, Config};
use contact_desk::messages::{message_template, Language};
use contact_desk::records::{parse_csv, NumericRange, SheetSource, Workbook};
use contact_desk::{AppError, Result};

/// Sheets held in memory, standing in for a spreadsheet file.
struct FixtureSource {
    sheets: Vec<(String, Range<Data>)>,
}

impl FixtureSource {
    fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    fn sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let cell = if value.is_empty() {
                    Data::Empty
                } else {
                    Data::String(value.to_string())
                };
                range.set_value((r as u32, c as u32), cell);
            }
        }
        self.sheets.push((name.to_string(), range));
        self
    }
}

impl SheetSource for FixtureSource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Range<Data>> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, range)| range.clone())
            .ok_or_else(|| AppError::invalid_selection(format!("no sheet {name}")))
    }
}

fn workbook(config: &Config) -> Workbook {
    let mut source = FixtureSource::new()
        .sheet(
            "EU_MEPs_All_2024_2029",
            &[
                &[
                    "Name",
                    "Country",
                    "Profile_URL",
                    "National_party",
                    "Email (generated guess)",
                ],
                &[
                    "Alice Berg",
                    "Sweden",
                    "https://ep.eu/1",
                    "S",
                    "alice.berg@ep.eu",
                ],
                &[
                    "Jean Dupont",
                    "France",
                    "https://ep.eu/2",
                    "RE",
                    "jean.dupont@ep.eu",
                ],
                &[
                    "Erik Lund",
                    "Sweden",
                    "https://ep.eu/3",
                    "M",
                    "erik.lund@ep.eu",
                ],
            ],
        )
        .sheet(
            "Riksdag_SeatHolders_349",
            &[
                &["Name", "Party", "Email"],
                &["Karin Ek", "S", "karin.ek@riksdagen.se"],
                &["Olof Ek", "M", "karin.ek@riksdagen.se"],
            ],
        )
        .sheet(
            "Top_200_X",
            &[
                &[
                    "Name",
                    "X_Handle",
                    "X_URL",
                    "Followers",
                    "Followers_text",
                    "Category",
                ],
                &["Jack", "@jack", "", "1,200", "1.2K", "Tech"],
                &[
                    "Nasa",
                    "",
                    "https://x.com/nasa",
                    "35 000",
                    "35K",
                    "Science",
                ],
                &["Nobody", "ghost", "", "n/a", "", "Tech"],
            ],
        );
    Workbook::load(&mut source, config).expect("load fixture workbook")
}

#[test]
fn every_category_selects_a_list_with_its_configured_display_schema() {
    let config = Config::builtin();
    let workbook = workbook(&config);
    let selector = ListSelector::new(&config, &workbook);

    for category in Category::ALL {
        let list = selector.select_category(category).expect("category list");
        let sheet = config.sheet(list.name()).expect("configured sheet");
        let display = list.project(&sheet.display_columns);
        assert_eq!(display.columns(), sheet.display_columns.as_slice(), "{category}");
    }
}

#[test]
fn x_handles_and_urls_are_reconstructed_and_followers_filterable() {
    let config = Config::builtin();
    let workbook = workbook(&config);
    let list = workbook.list("Top_200_X").expect("x list");

    assert_eq!(list.value(0, "X_Handle"), Some("jack"));
    assert_eq!(list.value(0, "X_URL"), Some("https://x.com/jack"));
    assert_eq!(list.value(1, "X_Handle"), Some("nasa"));
    assert_eq!(list.value(2, "Followers"), Some(""));

    let state = BrowseState::new("Top_200_X").apply(BrowseAction::SetRange(Some(
        NumericRange::new("Followers", 1000.0, 2000.0),
    )));
    let visible = state.visible(&workbook).expect("visible rows");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible.value(0, "Name"), Some("Jack"));
}

#[test]
fn sweden_only_export_round_trips_through_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::builtin();
    config.exports_dir = dir.path().join("exports");
    let workbook = workbook(&config);

    let summary = app::export_list(
        &config,
        &workbook,
        &ExportRequest {
            list: "europe".to_string(),
            filters: vec!["Country=Sweden".to_string()],
            all_columns: true,
            ..ExportRequest::default()
        },
    )
    .expect("export");
    assert_eq!(summary.rows, 2);

    let parsed = parse_csv("export", fs::File::open(&summary.path).expect("open export"))
        .expect("parse export");
    let original = workbook.list("EU_MEPs_All_2024_2029").expect("europe list");
    assert_eq!(parsed.columns(), original.columns());
    assert!((0..parsed.len()).all(|row| parsed.value(row, "Country") == Some("Sweden")));
}

#[test]
fn emails_are_unique_per_list() {
    let config = Config::builtin();
    let workbook = workbook(&config);
    let view = app::view_from_args(&[], None, 0).expect("view");

    let emails = app::collect_emails(&config, &workbook, "Riksdag_SeatHolders_349", &view)
        .expect("emails");
    assert_eq!(emails, vec!["karin.ek@riksdagen.se".to_string()]);
}

#[test]
fn missing_workbook_is_a_missing_file_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Workbook::open(dir.path().join("absent.xlsx"), &Config::builtin())
        .expect_err("missing workbook");
    assert!(matches!(err, AppError::MissingFile { .. }), "{err}");
}

#[test]
fn message_templates_differ_by_language() {
    let english = message_template(Language::English);
    let swedish = message_template("sv".parse().expect("swedish"));
    assert!(!english.trim().is_empty());
    assert!(!swedish.trim().is_empty());
    assert_ne!(english, swedish);
}
