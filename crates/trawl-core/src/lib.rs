//! # trawl-core
//!
//! Core types for the trawl issue scraper: the unified error type, the
//! environment-backed settings struct, and the `Issue` record that every
//! scrape produces.

mod config;
mod error;
mod types;

pub use config::Settings;
pub use error::{Result, TrawlError};
pub use types::{
    Issue, DESCRIPTION_FETCH_FAILED, FALLBACK_DESCRIPTION, FALLBACK_SUMMARY, FIELD_UNAVAILABLE,
    NO_DESCRIPTION,
};
