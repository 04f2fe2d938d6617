//! The issue record produced by a scrape

use serde::{Deserialize, Serialize};

/// Placeholder for any short field that could not be extracted.
pub const FIELD_UNAVAILABLE: &str = "N/A";

/// Description default when no selector on the issue page matched.
pub const NO_DESCRIPTION: &str = "No description available";

/// Description sentinel when fetching the issue page itself failed.
pub const DESCRIPTION_FETCH_FAILED: &str = "Error fetching description";

/// Summary sentinel for records built from bare links.
pub const FALLBACK_SUMMARY: &str = "Summary not available";

/// Description sentinel for records built from bare links.
pub const FALLBACK_DESCRIPTION: &str = "Description not available";

/// One scraped issue.
///
/// `key` and `url` are required at construction; every other field is
/// best-effort and falls back to its sentinel independently. Timestamps are
/// kept as the free text matched on the page (`"Jan 5, 2024, 3:00 PM"`),
/// never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub url: String,
    pub summary: String,
    pub reporter: String,
    pub priority: String,
    pub status: String,
    pub created: String,
    pub updated: String,
    pub description: String,
}

impl Issue {
    /// Build the degraded record used when no structured rows were found
    /// and only a bare issue link is available.
    pub fn from_link(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            summary: FALLBACK_SUMMARY.to_string(),
            reporter: FIELD_UNAVAILABLE.to_string(),
            priority: FIELD_UNAVAILABLE.to_string(),
            status: FIELD_UNAVAILABLE.to_string(),
            created: FIELD_UNAVAILABLE.to_string(),
            updated: FIELD_UNAVAILABLE.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_link_carries_sentinels() {
        let issue = Issue::from_link("PROJ-42", "/browse/PROJ-42");
        assert_eq!(issue.key, "PROJ-42");
        assert_eq!(issue.url, "/browse/PROJ-42");
        assert_eq!(issue.summary, FALLBACK_SUMMARY);
        assert_eq!(issue.description, FALLBACK_DESCRIPTION);
        assert_eq!(issue.reporter, FIELD_UNAVAILABLE);
        assert_eq!(issue.created, FIELD_UNAVAILABLE);
        assert_eq!(issue.updated, FIELD_UNAVAILABLE);
    }
}
