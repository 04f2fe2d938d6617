//! Scraping domain for trawl
//!
//! Everything between the browser session and the printed report lives
//! here: the multi-step login flow with bounded retry, the row locator and
//! its degraded link-only fallback, the per-field selector-cascade
//! extractors, the two-pass scrape orchestrator, and the console report.
//!
//! The cascade pattern is shared across modules: an ordered list of lookup
//! candidates is tried in sequence and the first non-empty result wins.
//! Failed candidates are never errors, only reasons to move on.

pub mod cascade;
pub mod extract;
pub mod locate;
pub mod login;
pub mod report;
pub mod scraper;

pub use scraper::{JiraScraper, Scraper};
