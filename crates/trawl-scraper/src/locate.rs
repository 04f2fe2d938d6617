//! Locating issue rows on the list page

use crate::cascade::select_first;
use headless_chrome::{Element, Tab};
use tracing::{debug, info, warn};
use trawl_browser::attribute;
use trawl_core::Issue;

/// Row selectors in priority order: the specific list-item test id first,
/// then generic test-id rows and divs, the legacy classic-view classes,
/// and bare issue links as the last resort.
pub const ROW_SELECTORS: &[&str] = &[
    "[data-testid='issue-list.ui.list-item']",
    "tr[data-testid*='issue']",
    "div[data-testid*='issue']",
    ".issuerow",
    "tr.issuerow",
    "a[href*='/browse/']",
];

/// Anchor selector matching any issue detail link.
pub const ISSUE_LINK_SELECTOR: &str = "a[href*='/browse/']";

/// Find the set of issue-row elements, trying selectors in priority order.
///
/// The first selector with a non-empty match set wins and later selectors
/// are not consulted. Returns an empty vec when every selector misses; the
/// orchestrator then falls back to [`fallback_issues`].
pub fn issue_rows(tab: &Tab) -> Vec<Element<'_>> {
    let found = select_first(ROW_SELECTORS, |selector| match tab.find_elements(selector) {
        Ok(rows) if !rows.is_empty() => Some(rows),
        Ok(_) => None,
        Err(e) => {
            debug!("Selector {} failed: {}", selector, e);
            None
        }
    });

    match found {
        Some((index, rows)) => {
            info!(
                "Found {} elements with selector: {}",
                rows.len(),
                ROW_SELECTORS[index]
            );
            rows
        }
        None => {
            warn!("No issue rows found with any selector");
            Vec::new()
        }
    }
}

/// Degraded extraction used when no structured rows exist: scan the bare
/// issue links and build minimal records carrying only key and URL, with
/// every other field sentinel-valued. The field extractors are not run.
pub fn fallback_issues(tab: &Tab) -> Vec<Issue> {
    info!("Trying direct link extraction");

    let links = match tab.find_elements(ISSUE_LINK_SELECTOR) {
        Ok(links) => links,
        Err(e) => {
            debug!("Link query failed: {}", e);
            Vec::new()
        }
    };

    let mut issues = Vec::new();
    for link in &links {
        let key = match link.get_inner_text() {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                debug!("Error reading link text: {}", e);
                continue;
            }
        };
        let url = attribute(link, "href").unwrap_or_default();
        if key.is_empty() || url.is_empty() {
            continue;
        }
        issues.push(Issue::from_link(key, url));
    }

    info!("Found {} issues using fallback extraction", issues.len());
    issues
}
