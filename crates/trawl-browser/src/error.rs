//! Browser error types - re-exports the unified TrawlError from trawl-core
//!
//! Browser failures use the Browser variant for launch/navigation/CDP
//! errors and the Timeout variant for expired bounded waits.

pub use trawl_core::{Result, TrawlError};
