use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppError, Result};

pub mod loader;
pub mod validator;

pub use loader::load_config_file;

pub const DEFAULT_WORKBOOK: &str = "iran_blackout_contacts.xlsx";
pub const DEFAULT_FLAG: &str = "flag.png";
pub const DEFAULT_EXPORTS_DIR: &str = "exports";

/// Top-level grouping shown in the list selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Category {
    Europe,
    Sweden,
    International,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Europe, Category::Sweden, Category::International];

    pub fn label(self) -> &'static str {
        match self {
            Category::Europe => "Europe",
            Category::Sweden => "Sweden",
            Category::International => "International",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "europe" | "eu" => Ok(Category::Europe),
            "sweden" | "se" => Ok(Category::Sweden),
            "international" | "influencers" => Ok(Category::International),
            other => Err(AppError::invalid_selection(format!(
                "Unknown category `{other}`. Expected one of: Europe, Sweden, International."
            ))),
        }
    }
}

/// Handle/URL column pair that can be reconstructed from one another.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileLink {
    pub handle_column: String,
    pub url_column: String,
    pub url_prefix: String,
}

/// Per-sheet rules: which columns hold emails, which get filters, what gets displayed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SheetConfig {
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email_columns: Vec<String>,
    #[serde(default)]
    pub filter_columns: Vec<String>,
    #[serde(default)]
    pub display_columns: Vec<String>,
    #[serde(default)]
    pub dedupe_subset: Vec<String>,
    #[serde(default)]
    pub numeric_columns: Vec<String>,
    #[serde(default)]
    pub profile_link: Option<ProfileLink>,
    #[serde(default)]
    pub range_column: Option<String>,
    #[serde(default)]
    pub limit_label: Option<String>,
}

impl SheetConfig {
    fn new(key: &str, display_name: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            email_columns: Vec::new(),
            filter_columns: Vec::new(),
            display_columns: Vec::new(),
            dedupe_subset: Vec::new(),
            numeric_columns: Vec::new(),
            profile_link: None,
            range_column: None,
            limit_label: None,
        }
    }

    fn emails(mut self, columns: &[&str]) -> Self {
        self.email_columns = strings(columns);
        self
    }

    fn filters(mut self, columns: &[&str]) -> Self {
        self.filter_columns = strings(columns);
        self
    }

    fn display(mut self, columns: &[&str]) -> Self {
        self.display_columns = strings(columns);
        self
    }

    fn numeric(mut self, columns: &[&str]) -> Self {
        self.numeric_columns = strings(columns);
        self
    }

    fn profile(mut self, handle: &str, url: &str, prefix: &str) -> Self {
        self.profile_link = Some(ProfileLink {
            handle_column: handle.to_string(),
            url_column: url.to_string(),
            url_prefix: prefix.to_string(),
        });
        self
    }

    fn followers_range(mut self) -> Self {
        self.range_column = Some("Followers".to_string());
        self
    }

    pub fn limit_label(&self) -> &str {
        self.limit_label
            .as_deref()
            .unwrap_or("Limit rows (0 = no limit)")
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub sheets: Vec<String>,
}

/// Immutable application configuration handed to the loader and selector.
#[derive(Debug, Clone)]
pub struct Config {
    pub workbook_path: PathBuf,
    pub flag_path: PathBuf,
    pub exports_dir: PathBuf,
    pub sheets: Vec<SheetConfig>,
    pub groups: Vec<CategoryGroup>,
}

impl Config {
    pub fn builtin() -> Self {
        let sheets = vec![
            SheetConfig::new(
                "EU_MEPs_All_2024_2029",
                "EU MEPs 2024–2029",
                "Members of the European Parliament",
            )
            .emails(&["Email (generated guess)"])
            .filters(&["Country"])
            .display(&["Name", "Profile_URL", "National_party", "Email (generated guess)"]),
            SheetConfig::new(
                "Riksdag_SeatHolders_349",
                "Riksdag MPs",
                "Swedish Parliament seat holders",
            )
            .emails(&["Email"])
            .filters(&["Party"])
            .display(&["Name", "Party", "Email"]),
            SheetConfig::new(
                "Sweden_Gov_Ministers",
                "Sweden Government Ministers",
                "Government ministers and registrator contacts",
            )
            .emails(&["Contact email (registrator)"])
            .filters(&["Ministry"])
            .display(&["Name", "Title", "Contact email (registrator)"]),
            SheetConfig::new(
                "Sweden_Gov_Deputies_Links",
                "Sweden Government Deputies",
                "Deputies/state secretaries (no emails in sheet)",
            )
            .display(&["Minister", "Minister title", "Deputies page (state secretaries)"]),
            SheetConfig::new(
                "Sweden_Embassies_All",
                "Sweden Embassies & Consulates",
                "Swedish embassies and consulates",
            )
            .emails(&["Email"])
            .filters(&["Location"])
            .display(&["Country/Area", "Location", "Contact_URL", "Email"]),
            {
                let mut sheet = SheetConfig::new(
                    "Influencers_IG_Top1000",
                    "Influencers – Instagram Top 1000",
                    "Top Swedish Instagram accounts (no emails in sheet)",
                )
                .display(&["Name", "Instagram_URL"])
                .numeric(&["Followers", "Avg_Engagement", "Authentic_Engagement"])
                .followers_range();
                sheet.dedupe_subset = strings(&["IG_Handle"]);
                sheet
            },
            SheetConfig::new(
                "Top_100_TikTok",
                "Influencers – TikTok Top 100",
                "Top TikTok accounts",
            )
            .display(&["Name", "TikTok_Handle", "TikTok_URL", "Followers"])
            .numeric(&["Followers"])
            .profile("TikTok_Handle", "TikTok_URL", "https://www.tiktok.com/@")
            .followers_range(),
            {
                let mut sheet =
                    SheetConfig::new("Top_200_X", "Influencers – X Top 200", "Top X accounts")
                        .filters(&["Category"])
                        .display(&[
                            "Name",
                            "X_Handle",
                            "X_URL",
                            "Followers",
                            "Followers_text",
                            "Category",
                        ])
                        .numeric(&["Followers"])
                        .profile("X_Handle", "X_URL", "https://x.com/")
                        .followers_range();
                sheet.limit_label = Some("Limit to N influencers (0 = all)".to_string());
                sheet
            },
        ];

        let groups = vec![
            CategoryGroup {
                category: Category::Europe,
                sheets: strings(&["EU_MEPs_All_2024_2029"]),
            },
            CategoryGroup {
                category: Category::Sweden,
                sheets: strings(&[
                    "Riksdag_SeatHolders_349",
                    "Sweden_Gov_Ministers",
                    "Sweden_Gov_Deputies_Links",
                    "Sweden_Embassies_All",
                    "Influencers_IG_Top1000",
                    "Top_100_TikTok",
                ]),
            },
            CategoryGroup {
                category: Category::International,
                sheets: strings(&["Top_200_X"]),
            },
        ];

        Config {
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK),
            flag_path: PathBuf::from(DEFAULT_FLAG),
            exports_dir: PathBuf::from(DEFAULT_EXPORTS_DIR),
            sheets,
            groups,
        }
    }

    /// Start from the built-in tables and apply an optional JSON override file.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let config = match override_path {
            Some(path) => load_config_file(path, Self::builtin())?,
            None => Self::builtin(),
        };
        validator::validate_config(&config)?;
        Ok(config)
    }

    pub fn sheet(&self, key: &str) -> Option<&SheetConfig> {
        self.sheets.iter().find(|sheet| sheet.key == key)
    }

    pub fn group(&self, category: Category) -> Option<&CategoryGroup> {
        self.groups.iter().find(|group| group.category == category)
    }

    /// Sheet keys in selector order (group by group).
    pub fn ordered_sheet_keys(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|group| group.sheets.iter().map(String::as_str))
            .collect()
    }

    pub fn default_sheet(&self) -> Option<&str> {
        self.ordered_sheet_keys().into_iter().next()
    }
}
