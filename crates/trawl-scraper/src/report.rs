//! Human-readable console report

use trawl_core::Issue;

/// How much of a description the report shows.
const DESCRIPTION_PREVIEW_CHARS: usize = 200;

/// Print the formatted issue report to stdout.
pub fn print_issues(issues: &[Issue]) {
    println!("\n=== Jira Issues ===");
    for issue in issues {
        print!("{}", format_issue(issue));
    }
}

/// Render one record: key and summary, the short fields, timestamps, a
/// truncated description, the URL, and a separator line.
pub fn format_issue(issue: &Issue) -> String {
    format!(
        "{} | {}\n  \
         Reporter: {} | Priority: {} | Status: {}\n  \
         Created: {} | Updated: {}\n  \
         Description: {}...\n  \
         URL: {}\n  {}\n",
        issue.key,
        issue.summary,
        issue.reporter,
        issue.priority,
        issue.status,
        issue.created,
        issue.updated,
        truncate_chars(&issue.description, DESCRIPTION_PREVIEW_CHARS),
        issue.url,
        "-".repeat(50),
    )
}

/// Truncate to at most `max_chars` characters, never splitting a
/// character in the middle.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_text_unchanged() {
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("", 200), "");
    }

    #[test]
    fn test_truncate_caps_at_limit() {
        let long = "x".repeat(450);
        assert_eq!(truncate_chars(&long, 200).len(), 200);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 3), "ééé");
    }

    #[test]
    fn test_format_issue_layout() {
        let mut issue = Issue::from_link("PROJ-7", "https://site/browse/PROJ-7");
        issue.summary = "Fix the widget".to_string();
        issue.reporter = "Jane Doe".to_string();
        issue.status = "In Progress".to_string();
        issue.description = "d".repeat(300);

        let rendered = format_issue(&issue);
        assert!(rendered.starts_with("PROJ-7 | Fix the widget\n"));
        assert!(rendered.contains("Reporter: Jane Doe | Priority: N/A | Status: In Progress"));
        assert!(rendered.contains("URL: https://site/browse/PROJ-7"));
        // 200-char preview plus the ellipsis marker.
        assert!(rendered.contains(&format!("Description: {}...", "d".repeat(200))));
        assert!(rendered.ends_with(&format!("{}\n", "-".repeat(50))));
    }
}
