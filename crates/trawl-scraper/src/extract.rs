//! Per-field extractors over one issue row
//!
//! Every extractor takes a row element and yields one field value. All of
//! them share the cascade policy: selectors are tried in priority order,
//! any resolution failure advances to the next candidate, and exhaustion
//! yields the `"N/A"` sentinel rather than an error. Only the key extractor
//! can report absence, which excludes the row entirely.

use crate::cascade::select_first;
use headless_chrome::Element;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use trawl_browser::attribute;
use trawl_core::FIELD_UNAVAILABLE;

const KEY_SELECTORS: &[&str] = &[
    "a[href*='/browse/']",
    ".issue-link",
    "[data-testid*='issue-key']",
];

const SUMMARY_SELECTORS: &[&str] = &["[data-testid*='summary']", ".summary", ".issue-summary"];

/// Attribute-bearing selectors tried before any text lookup. Their raw
/// values carry UI boilerplate that must be stripped off.
const REPORTER_ATTRIBUTE_SELECTORS: &[(&str, &str)] = &[
    ("button[aria-label*='edit Reporter']", "aria-label"),
    ("span[aria-label*='More information about']", "aria-label"),
];

const REPORTER_TEXT_SELECTORS: &[&str] = &[
    "span[hidden]",
    "span._1reo15vq span",
    "[data-vc='profilecard-wrapper-ssr'] span",
];

const PRIORITY_SELECTORS: &[&str] = &[
    "span._1reo15vq._18m915vq._18u0u2gc",
    ".priority",
    "[data-testid*='priority']",
];

const STATUS_SELECTORS: &[&str] = &[
    "span._1reo15vq div._4cvr1h6o",
    ".status span",
    "[data-testid*='status'] span",
];

/// Inline-edit read view wrapping each labeled field on an issue row.
const READ_VIEW_CONTAINER: &str =
    "[data-testid='issue-field-inline-edit-read-view-container.ui.container']";

/// Timestamps as Jira renders them: `"Jan 5, 2024, 3:00 PM"`.
const DATE_PATTERN: &str = r"[A-Za-z]{3}\s+\d{1,2},\s+\d{4},\s+\d{1,2}:\d{2}\s+[AP]M";

fn date_regex() -> &'static Regex {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    DATE_REGEX.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is valid"))
}

fn sentinel() -> String {
    FIELD_UNAVAILABLE.to_string()
}

/// Trimmed inner text of an element, with empty results treated as misses.
fn element_text(element: &Element<'_>) -> Option<String> {
    let text = element.get_inner_text().ok()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Run the shared cascade over `selectors`, taking the first candidate that
/// resolves to non-empty text inside the row.
fn try_selectors(row: &Element<'_>, selectors: &[&str]) -> Option<String> {
    select_first(selectors, |selector| {
        row.find_element(selector)
            .ok()
            .and_then(|el| element_text(&el))
    })
    .map(|(_, text)| text)
}

/// Extract the issue key and detail-page URL from a row.
///
/// A candidate only counts if both the link text and its href are present
/// and non-empty. Absence means the row is dropped by the caller.
pub fn issue_key(row: &Element<'_>) -> Option<(String, String)> {
    select_first(KEY_SELECTORS, |selector| {
        let element = row.find_element(selector).ok()?;
        let key = element_text(&element)?;
        let url = attribute(&element, "href").filter(|href| !href.is_empty())?;
        Some((key, url))
    })
    .map(|(_, pair)| pair)
}

pub fn summary(row: &Element<'_>) -> String {
    try_selectors(row, SUMMARY_SELECTORS).unwrap_or_else(sentinel)
}

/// Extract the reporter name.
///
/// Attribute-based candidates come first; an "Unassigned" reporter in any
/// tier is treated as absent, not as a value.
pub fn reporter(row: &Element<'_>) -> String {
    for &(selector, attribute_name) in REPORTER_ATTRIBUTE_SELECTORS {
        let Some(raw) = row
            .find_element(selector)
            .ok()
            .and_then(|el| attribute(&el, attribute_name))
        else {
            continue;
        };
        if let Some(name) = clean_reporter(&raw) {
            return name;
        }
    }

    match try_selectors(row, REPORTER_TEXT_SELECTORS) {
        Some(text) if !text.eq_ignore_ascii_case("unassigned") => text,
        _ => sentinel(),
    }
}

pub fn priority(row: &Element<'_>) -> String {
    try_selectors(row, PRIORITY_SELECTORS).unwrap_or_else(sentinel)
}

/// Extract the status, keeping only the first line of the matched text
/// (status lozenges render extra lines below the name).
pub fn status(row: &Element<'_>) -> String {
    match try_selectors(row, STATUS_SELECTORS) {
        Some(text) => first_line(&text).to_string(),
        None => sentinel(),
    }
}

/// Extract the creation timestamp.
///
/// Tier 1 looks for the read-view container labeled "Edit Created"; tier 2
/// falls back to the first date-shaped substring anywhere in the row.
pub fn created(row: &Element<'_>) -> String {
    if let Some(date) = labeled_date(row, "Edit Created") {
        return date;
    }
    row_dates(row).into_iter().next().unwrap_or_else(sentinel)
}

/// Extract the last-updated timestamp.
///
/// Tier 2 assumes unlabeled rows render the created date before the
/// updated date; with a single date present, that one is used for both.
pub fn updated(row: &Element<'_>) -> String {
    if let Some(date) = labeled_date(row, "Edit Updated") {
        return date;
    }
    let dates = row_dates(row);
    pick_updated(&dates).unwrap_or_else(sentinel)
}

/// Scan the labeled read-view containers for one whose edit control carries
/// `edit_label`, and pull the first date out of its text.
fn labeled_date(row: &Element<'_>, edit_label: &str) -> Option<String> {
    let containers = row.find_elements(READ_VIEW_CONTAINER).ok()?;
    let button_selector = format!("button[aria-label='{}']", edit_label);
    for container in containers {
        if container.find_element(&button_selector).is_err() {
            continue;
        }
        let Ok(text) = container.get_inner_text() else {
            debug!("Could not read text of labeled container");
            continue;
        };
        if let Some(date) = find_dates(&text).into_iter().next() {
            return Some(date);
        }
    }
    None
}

fn row_dates(row: &Element<'_>) -> Vec<String> {
    row.get_inner_text()
        .map(|text| find_dates(&text))
        .unwrap_or_default()
}

/// All date-shaped substrings of `text`, in document order.
pub fn find_dates(text: &str) -> Vec<String> {
    date_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Second date if present, else the first, else nothing.
fn pick_updated(dates: &[String]) -> Option<String> {
    dates.get(1).or_else(|| dates.first()).cloned()
}

/// Strip UI boilerplate from a raw reporter label.
///
/// Returns None when nothing remains or the reporter is "Unassigned" in
/// any casing, so the cascade keeps going.
pub fn clean_reporter(raw: &str) -> Option<String> {
    let cleaned = raw
        .replace("- edit Reporter", "")
        .replace("More information about", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("unassigned") {
        None
    } else {
        Some(cleaned.to_string())
    }
}

pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_reporter_strips_edit_label() {
        assert_eq!(
            clean_reporter("Jane Doe - edit Reporter"),
            Some("Jane Doe".to_string())
        );
    }

    #[test]
    fn test_clean_reporter_strips_information_label() {
        assert_eq!(
            clean_reporter("More information about Jane Doe"),
            Some("Jane Doe".to_string())
        );
    }

    #[test]
    fn test_clean_reporter_unassigned_is_absent() {
        assert_eq!(clean_reporter("Unassigned"), None);
        assert_eq!(clean_reporter("UNASSIGNED - edit Reporter"), None);
        assert_eq!(clean_reporter("   "), None);
    }

    #[test]
    fn test_date_pattern_matches_rendered_format() {
        let dates = find_dates("Created Jan 5, 2024, 3:00 PM by someone");
        assert_eq!(dates, vec!["Jan 5, 2024, 3:00 PM"]);
    }

    #[test]
    fn test_find_dates_preserves_document_order() {
        let text = "Jan 5, 2024, 3:00 PM ... Jan 6, 2024, 9:15 AM";
        let dates = find_dates(text);
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0], "Jan 5, 2024, 3:00 PM");
        assert_eq!(dates[1], "Jan 6, 2024, 9:15 AM");
    }

    #[test]
    fn test_pick_updated_prefers_second_date() {
        let dates = vec![
            "Jan 5, 2024, 3:00 PM".to_string(),
            "Jan 6, 2024, 9:15 AM".to_string(),
        ];
        assert_eq!(pick_updated(&dates), Some("Jan 6, 2024, 9:15 AM".to_string()));
    }

    #[test]
    fn test_pick_updated_single_date_serves_both() {
        let dates = vec!["Jan 5, 2024, 3:00 PM".to_string()];
        assert_eq!(pick_updated(&dates), Some("Jan 5, 2024, 3:00 PM".to_string()));
        assert_eq!(pick_updated(&[]), None);
    }

    #[test]
    fn test_first_line_drops_trailing_lines() {
        assert_eq!(first_line("In Progress\nView workflow"), "In Progress");
        assert_eq!(first_line("Done"), "Done");
        assert_eq!(first_line(""), "");
    }
}
