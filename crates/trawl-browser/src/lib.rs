//! Browser session lifecycle over the Chrome DevTools Protocol
//!
//! This crate wraps `headless_chrome` behind the small surface the scraper
//! consumes: launch a configured browser, navigate, wait for elements or a
//! URL condition within a bounded time, read attributes, and capture a
//! diagnostic screenshot. The session owns exactly one tab; every wait is a
//! blocking poll with a maximum duration.

pub mod browser;
pub mod error;

pub use browser::{attribute, BrowserConfig, BrowserSession};
pub use error::{Result, TrawlError};
