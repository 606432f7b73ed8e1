use std::collections::HashSet;

use log::warn;

use crate::config::{ProfileLink, SheetConfig};

use super::sheet::format_number;
use super::ContactList;

/// Apply the per-sheet cleanup rules: dedupe, numeric cleanup, handle/URL reconstruction.
pub fn normalize_list(list: &mut ContactList, sheet: &SheetConfig) {
    if !sheet.dedupe_subset.is_empty() {
        dedupe(list, &sheet.dedupe_subset);
    }
    normalize_numeric(list, &sheet.numeric_columns);
    if let Some(link) = &sheet.profile_link {
        fill_profile_links(list, link);
        normalize_numeric(list, &sheet.numeric_columns);
    }
}

fn dedupe(list: &mut ContactList, subset: &[String]) {
    let indices: Vec<usize> = subset
        .iter()
        .filter_map(|column| list.column_index(column))
        .collect();
    if indices.is_empty() {
        warn!(
            "sheet `{}` has none of the dedupe columns {:?}; keeping all rows",
            list.name(),
            subset
        );
        return;
    }

    let mut seen = HashSet::new();
    list.rows_mut().retain(|record| {
        let key: Vec<String> = indices
            .iter()
            .map(|&i| record.get(i).unwrap_or_default().trim().to_string())
            .collect();
        seen.insert(key)
    });
}

fn normalize_numeric(list: &mut ContactList, columns: &[String]) {
    for column in columns {
        let Some(index) = list.column_index(column) else {
            continue;
        };
        for record in list.rows_mut() {
            let cleaned = clean_number(record.get(index).unwrap_or_default());
            record.set(index, cleaned);
        }
    }
}

/// Strip thousands separators and spaces; anything that still is not a number becomes blank.
fn clean_number(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|ch| *ch != ',' && *ch != ' ').collect();
    if stripped.is_empty() {
        return String::new();
    }
    stripped
        .parse::<f64>()
        .map(format_number)
        .unwrap_or_default()
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value == "nan"
}

fn fill_profile_links(list: &mut ContactList, link: &ProfileLink) {
    let url_index = match list.column_index(&link.url_column) {
        Some(index) => index,
        None => list.push_column(&link.url_column, ""),
    };
    let handle_index = list.column_index(&link.handle_column);
    let (host, marker) = prefix_parts(&link.url_prefix);

    for record in list.rows_mut() {
        let url = record.get(url_index).unwrap_or_default().trim().to_string();

        let handle = match handle_index {
            Some(index) => {
                let raw = record.get(index).unwrap_or_default().trim();
                let mut handle = raw.strip_prefix('@').unwrap_or(raw).to_string();
                if is_missing(&handle) {
                    handle = handle_from_url(&url, &host, &marker).unwrap_or_default();
                }
                record.set(index, handle.clone());
                handle
            }
            None => String::new(),
        };

        let url = if is_missing(&url) {
            format!("{}{}", link.url_prefix, handle)
        } else {
            url
        };
        record.set(url_index, url);
    }
}

/// Split `https://www.tiktok.com/@` into the bare host (`tiktok.com`) and the marker that
/// precedes the handle in the path (`@`).
fn prefix_parts(prefix: &str) -> (String, String) {
    let rest = strip_scheme(prefix);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    match rest.split_once('/') {
        Some((host, marker)) => (host.to_lowercase(), marker.to_string()),
        None => (rest.to_lowercase(), String::new()),
    }
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

fn handle_from_url(url: &str, host: &str, marker: &str) -> Option<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return None;
    }
    let rest = strip_scheme(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let (url_host, path) = rest.split_once('/')?;
    if !url_host.eq_ignore_ascii_case(host) {
        return None;
    }
    let path = path.strip_prefix(marker).unwrap_or(path);
    let handle: String = path
        .chars()
        .take_while(|ch| !matches!(ch, '/' | '?' | '#'))
        .collect();
    if handle.is_empty() {
        None
    } else {
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::records::fixtures::list;

    #[test]
    fn dedupes_instagram_handles_keeping_first() {
        let config = Config::builtin();
        let sheet = config.sheet("Influencers_IG_Top1000").expect("ig sheet");
        let mut table = list(
            "Influencers_IG_Top1000",
            &["Name", "IG_Handle", "Instagram_URL", "Followers"],
            &[
                &["Zara", "zara", "https://instagram.com/zara", "1,200,000"],
                &[
                    "Zara again",
                    "zara",
                    "https://instagram.com/zara",
                    "1 200 000",
                ],
                &["Ola", "ola", "https://instagram.com/ola", "n/a"],
            ],
        );

        normalize_list(&mut table, sheet);

        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "Name"), Some("Zara"));
        assert_eq!(table.value(0, "Followers"), Some("1200000"));
        assert_eq!(table.value(1, "Followers"), Some(""));
    }

    #[test]
    fn builds_tiktok_urls_from_handles() {
        let config = Config::builtin();
        let sheet = config.sheet("Top_100_TikTok").expect("tiktok sheet");
        let mut table = list(
            "Top_100_TikTok",
            &["Name", "TikTok_Handle", "Followers"],
            &[
                &["Dancer", " @dancer ", "5,000"],
                &["Chef", "chef", "12 000"],
            ],
        );

        normalize_list(&mut table, sheet);

        assert_eq!(table.columns().last().map(String::as_str), Some("TikTok_URL"));
        assert_eq!(table.value(0, "TikTok_Handle"), Some("dancer"));
        assert_eq!(
            table.value(0, "TikTok_URL"),
            Some("https://www.tiktok.com/@dancer")
        );
        assert_eq!(table.value(1, "Followers"), Some("12000"));
    }

    #[test]
    fn derives_missing_x_handles_from_urls() {
        let config = Config::builtin();
        let sheet = config.sheet("Top_200_X").expect("x sheet");
        let mut table = list(
            "Top_200_X",
            &["Name", "X_Handle", "X_URL", "Followers"],
            &[
                &[
                    "Reporter",
                    "",
                    "https://www.x.com/reporter?lang=sv",
                    "900",
                ],
                &["Outlet", "nan", "https://twitter.com/outlet", "100"],
                &["Writer", "@writer", "", "50"],
            ],
        );

        normalize_list(&mut table, sheet);

        assert_eq!(table.value(0, "X_Handle"), Some("reporter"));
        assert_eq!(
            table.value(0, "X_URL"),
            Some("https://www.x.com/reporter?lang=sv")
        );
        assert_eq!(table.value(1, "X_Handle"), Some(""));
        assert_eq!(table.value(1, "X_URL"), Some("https://twitter.com/outlet"));
        assert_eq!(table.value(2, "X_Handle"), Some("writer"));
        assert_eq!(table.value(2, "X_URL"), Some("https://x.com/writer"));
    }

    #[test]
    fn splits_prefix_into_host_and_marker() {
        assert_eq!(
            prefix_parts("https://www.tiktok.com/@"),
            ("tiktok.com".to_string(), "@".to_string())
        );
        assert_eq!(
            prefix_parts("https://x.com/"),
            ("x.com".to_string(), String::new())
        );
    }
}
