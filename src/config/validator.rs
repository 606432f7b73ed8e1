use std::collections::HashSet;

use crate::error::{AppError, Result};

use super::{Config, SheetConfig};

/// Validate the configuration and surface every issue in one message.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_sheet_keys(config, &mut issues);
    for sheet in &config.sheets {
        validate_sheet(sheet, &mut issues);
    }
    validate_groups(config, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "contact configuration invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_sheet_keys(config: &Config, issues: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for sheet in &config.sheets {
        if sheet.key.trim().is_empty() {
            issues.push("sheet key must not be empty".to_string());
        } else if !seen.insert(sheet.key.as_str()) {
            issues.push(format!("sheet `{}` is configured more than once", sheet.key));
        }
    }
}

fn validate_sheet(sheet: &SheetConfig, issues: &mut Vec<String>) {
    if sheet.display_name.trim().is_empty() {
        issues.push(format!("sheet `{}` has an empty display_name", sheet.key));
    }

    let lists = [
        ("email_columns", &sheet.email_columns),
        ("filter_columns", &sheet.filter_columns),
        ("display_columns", &sheet.display_columns),
        ("dedupe_subset", &sheet.dedupe_subset),
        ("numeric_columns", &sheet.numeric_columns),
    ];
    for (field, columns) in lists {
        if columns.iter().any(|column| column.trim().is_empty()) {
            issues.push(format!("sheet `{}` {field} contains a blank column", sheet.key));
        }
    }

    if let Some(link) = &sheet.profile_link {
        if link.handle_column.trim().is_empty() || link.url_column.trim().is_empty() {
            issues.push(format!(
                "sheet `{}` profile_link needs both handle_column and url_column",
                sheet.key
            ));
        }
        if !link.url_prefix.starts_with("http://") && !link.url_prefix.starts_with("https://") {
            issues.push(format!(
                "sheet `{}` profile_link.url_prefix must be an http(s) URL",
                sheet.key
            ));
        }
    }

    if let Some(range) = &sheet.range_column {
        if !sheet.numeric_columns.contains(range) {
            issues.push(format!(
                "sheet `{}` range_column `{range}` must also be listed in numeric_columns",
                sheet.key
            ));
        }
    }
}

fn validate_groups(config: &Config, issues: &mut Vec<String>) {
    if config.groups.is_empty() {
        issues.push("at least one category group is required".to_string());
    }

    let mut categories = HashSet::new();
    for group in &config.groups {
        if !categories.insert(group.category) {
            issues.push(format!("category {} is grouped more than once", group.category));
        }
        if group.sheets.is_empty() {
            issues.push(format!("category {} lists no sheets", group.category));
        }
        for key in &group.sheets {
            if config.sheet(key).is_none() {
                issues.push(format!(
                    "category {} references unknown sheet `{key}`",
                    group.category
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Category, CategoryGroup, ProfileLink};

    #[test]
    fn validates_builtin_config() {
        validate_config(&Config::builtin()).expect("builtin config should be valid");
    }

    #[test]
    fn rejects_group_with_unknown_sheet() {
        let mut config = Config::builtin();
        config.groups.push(CategoryGroup {
            category: Category::International,
            sheets: vec!["Top_50_Threads".to_string()],
        });

        let err = validate_config(&config).expect_err("validation should fail");
        let message = err.to_string();
        assert!(
            message.contains("unknown sheet `Top_50_Threads`"),
            "unexpected error message: {message}"
        );
        assert!(
            message.contains("grouped more than once"),
            "unexpected error message: {message}"
        );
    }

    #[test]
    fn rejects_range_column_that_is_not_numeric() {
        let mut config = Config::builtin();
        let sheet = config
            .sheets
            .iter_mut()
            .find(|sheet| sheet.key == "Riksdag_SeatHolders_349")
            .expect("riksdag sheet");
        sheet.range_column = Some("Seat".to_string());

        let err = validate_config(&config).expect_err("validation should fail");
        assert!(
            err.to_string().contains("numeric_columns"),
            "unexpected error message: {}",
            err
        );
    }

    #[test]
    fn rejects_non_http_profile_prefix() {
        let mut config = Config::builtin();
        config.sheets[0].profile_link = Some(ProfileLink {
            handle_column: "Handle".to_string(),
            url_column: "URL".to_string(),
            url_prefix: "x.com/".to_string(),
        });

        let err = validate_config(&config).expect_err("validation should fail");
        assert!(
            err.to_string().contains("url_prefix"),
            "unexpected error message: {err}"
        );
    }
}
