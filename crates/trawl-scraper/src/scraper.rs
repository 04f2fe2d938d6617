//! Two-pass scrape orchestration
//!
//! Pass 1 extracts every cheap same-page field across all rows while the
//! list page is still live. Pass 2 then navigates issue by issue to fetch
//! descriptions, which invalidates the list page's row handles — hence the
//! split. Login exhaustion is the only fatal failure; anything that goes
//! wrong after a session exists degrades to an empty result with a
//! diagnostic snapshot.

use crate::{extract, locate, login};
use async_trait::async_trait;
use headless_chrome::Element;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use trawl_browser::{BrowserConfig, BrowserSession};
use trawl_core::{Issue, Result, Settings, TrawlError, DESCRIPTION_FETCH_FAILED, NO_DESCRIPTION};

/// Wait bound for the issue list to render at least one issue link.
const LIST_TIMEOUT: Duration = Duration::from_secs(15);

/// Per-selector wait bound on an issue's detail page.
const DESCRIPTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Settle time after navigation, for client-side rendering to catch up.
const PAGE_SETTLE: Duration = Duration::from_secs(2);

const DEFAULT_LOGIN_ATTEMPTS: usize = 2;

/// Where the diagnostic snapshot lands when a scrape dies mid-flight.
const ERROR_SNAPSHOT_PATH: &str = "scrape_error.png";

/// Description container selectors on an issue's detail page, in priority
/// order from the renderer-specific paragraph down to legacy markup.
const DESCRIPTION_SELECTORS: &[&str] = &[
    "p[data-renderer-start-pos='1']",
    "[data-testid='issue.views.issue-base.foundation.description.description-content'] p",
    ".ak-editor-content-area p",
    ".user-content-block p",
    "[data-test-id='issue-description'] p",
];

/// The generic scraper contract: one concrete implementation per site.
#[async_trait]
pub trait Scraper {
    /// Authenticate against the target site.
    async fn login(&mut self) -> Result<()>;

    /// Run a full scrape, returning the ordered set of extracted records.
    async fn scrape(&mut self) -> Result<Vec<Issue>>;
}

/// Jira scraper: owns the browser session for the scrape's duration.
pub struct JiraScraper {
    session: BrowserSession,
    settings: Settings,
    max_login_attempts: usize,
    login_done: bool,
}

impl JiraScraper {
    /// Launch a browser session configured from `settings`.
    pub async fn launch(settings: Settings) -> Result<Self> {
        Self::launch_with_attempts(settings, DEFAULT_LOGIN_ATTEMPTS).await
    }

    /// Launch with a custom login retry bound.
    pub async fn launch_with_attempts(
        settings: Settings,
        max_login_attempts: usize,
    ) -> Result<Self> {
        let config = BrowserConfig {
            headless: settings.headless,
            ..BrowserConfig::default()
        };
        let session = BrowserSession::launch_with_config(config).await?;
        Ok(Self {
            session,
            settings,
            max_login_attempts,
            login_done: false,
        })
    }

    /// Shut the browser session down. Callers must reach this on every
    /// exit path; `BrowserSession`'s Drop is the backstop if they don't.
    pub async fn close(self) -> Result<()> {
        self.session.close().await
    }

    async fn open_page(&self, url: &str) -> Result<()> {
        self.session.navigate(url).await?;
        tokio::time::sleep(PAGE_SETTLE).await;
        Ok(())
    }

    async fn scrape_list(&self) -> Result<Vec<Issue>> {
        let list_url = format!(
            "{}/issues/?jql=ORDER%20BY%20created%20DESC",
            self.settings.jira_url
        );
        self.open_page(&list_url).await?;
        info!("Opened issue list: {}", self.session.current_url().await?);

        self.session
            .wait_for_element(locate::ISSUE_LINK_SELECTOR, Some(LIST_TIMEOUT))
            .await?;

        let rows = locate::issue_rows(self.session.tab());
        if rows.is_empty() {
            // Fallback records already carry sentinel descriptions, so the
            // description pass is skipped entirely.
            return Ok(locate::fallback_issues(self.session.tab()));
        }

        let mut issues = self.extract_rows(&rows);
        drop(rows);

        self.fetch_descriptions(&mut issues).await;
        Ok(issues)
    }

    /// Pass 1: extract all same-page fields from every row.
    ///
    /// Rows without a resolvable key and URL are skipped, not emitted with
    /// holes; every other field falls back to its sentinel independently.
    fn extract_rows(&self, rows: &[Element<'_>]) -> Vec<Issue> {
        info!("Processing all {} rows", rows.len());

        let mut issues = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            debug!("Processing row {}/{}", index + 1, rows.len());

            let Some((key, url)) = extract::issue_key(row) else {
                warn!("Row {} has no resolvable key and URL, skipping", index + 1);
                continue;
            };

            let issue = Issue {
                key,
                url,
                summary: extract::summary(row),
                reporter: extract::reporter(row),
                priority: extract::priority(row),
                status: extract::status(row),
                created: extract::created(row),
                updated: extract::updated(row),
                description: NO_DESCRIPTION.to_string(),
            };
            debug!("Extracted {}", issue.key);
            issues.push(issue);
        }

        info!("Basic extraction complete: {} issues", issues.len());
        issues
    }

    /// Pass 2: navigate to each issue page and attach its description.
    ///
    /// A failed fetch marks that record with the error sentinel and moves
    /// on; it never aborts the remaining records.
    async fn fetch_descriptions(&self, issues: &mut [Issue]) {
        let total = issues.len();
        info!("Fetching descriptions for {} issues", total);

        for (index, issue) in issues.iter_mut().enumerate() {
            debug!("Fetching description {}/{}: {}", index + 1, total, issue.key);
            issue.description = self.fetch_description(&issue.url).await;
        }
    }

    async fn fetch_description(&self, issue_url: &str) -> String {
        let full_url = resolve_issue_url(&self.settings.jira_url, issue_url);
        debug!("Fetching description from {}", full_url);

        if let Err(e) = self.session.navigate(&full_url).await {
            warn!("Error fetching description from {}: {}", full_url, e);
            return DESCRIPTION_FETCH_FAILED.to_string();
        }

        for selector in DESCRIPTION_SELECTORS {
            match self
                .session
                .wait_for_element(selector, Some(DESCRIPTION_TIMEOUT))
                .await
            {
                Ok(element) => {
                    if let Ok(text) = element.get_inner_text() {
                        let text = text.trim();
                        if !text.is_empty() {
                            return text.to_string();
                        }
                    }
                }
                Err(_) => continue,
            }
        }

        debug!("No description found with any selector");
        NO_DESCRIPTION.to_string()
    }

    /// Terminal error handling for a failed scrape: log, capture a
    /// diagnostic snapshot, degrade to an empty result.
    async fn handle_scrape_error(&self, error: TrawlError) -> Vec<Issue> {
        error!("Error during scraping: {}", error);
        match self.session.current_url().await {
            Ok(url) => error!("Current URL: {}", url),
            Err(e) => debug!("Could not read current URL: {}", e),
        }
        if let Err(e) = self
            .session
            .save_screenshot(Path::new(ERROR_SNAPSHOT_PATH))
            .await
        {
            warn!("Could not save diagnostic screenshot: {}", e);
        }
        Vec::new()
    }
}

#[async_trait]
impl Scraper for JiraScraper {
    async fn login(&mut self) -> Result<()> {
        login::login(&self.session, &self.settings, self.max_login_attempts).await?;
        self.login_done = true;
        Ok(())
    }

    async fn scrape(&mut self) -> Result<Vec<Issue>> {
        if !self.login_done {
            // Login exhaustion is fatal: scraping cannot proceed without
            // a session, so this error is the one that propagates.
            self.login().await?;
        }

        match self.scrape_list().await {
            Ok(issues) => {
                info!("Found {} issues total", issues.len());
                Ok(issues)
            }
            Err(e) => Ok(self.handle_scrape_error(e).await),
        }
    }
}

/// Resolve a possibly root-relative issue URL against the base site URL.
fn resolve_issue_url(base_url: &str, issue_url: &str) -> String {
    if issue_url.starts_with("/browse/") {
        format!("{}{}", base_url.trim_end_matches('/'), issue_url)
    } else {
        issue_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_issue_url() {
        assert_eq!(
            resolve_issue_url("https://team.atlassian.net", "/browse/PROJ-1"),
            "https://team.atlassian.net/browse/PROJ-1"
        );
        assert_eq!(
            resolve_issue_url("https://team.atlassian.net/", "/browse/PROJ-1"),
            "https://team.atlassian.net/browse/PROJ-1"
        );
    }

    #[test]
    fn test_resolve_absolute_issue_url_untouched() {
        assert_eq!(
            resolve_issue_url(
                "https://team.atlassian.net",
                "https://team.atlassian.net/browse/PROJ-1"
            ),
            "https://team.atlassian.net/browse/PROJ-1"
        );
    }
}
