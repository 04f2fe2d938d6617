//! Browser lifecycle management using Chrome DevTools Protocol

use crate::error::{Result, TrawlError};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How often URL-condition waits re-check the live location.
const URL_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Run Chrome with its sandbox enabled. Off by default so the scraper
    /// works inside containers, together with `--disable-dev-shm-usage`.
    pub sandbox: bool,
    /// Default timeout for element waits, in seconds
    pub timeout_seconds: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            sandbox: false,
            timeout_seconds: 40,
        }
    }
}

/// Active browser session with Chrome DevTools Protocol
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    /// Configuration
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a new browser instance with default configuration
    ///
    /// # Example
    /// ```no_run
    /// use trawl_browser::BrowserSession;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let session = BrowserSession::launch().await.unwrap();
    ///     session.navigate("https://example.com").await.unwrap();
    /// }
    /// ```
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(BrowserConfig::default()).await
    }

    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .sandbox(config.sandbox)
            .args(vec![OsStr::new("--disable-dev-shm-usage")])
            .build()
            .map_err(|e| TrawlError::Browser(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| TrawlError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| TrawlError::Browser(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Navigate to a URL and wait for the navigation to complete
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| TrawlError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| TrawlError::Browser(format!("Navigation timeout for {}: {}", url, e)))?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Default element-wait timeout from the session configuration
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    /// Wait for an element to appear, bounded by `timeout`
    ///
    /// Uses the configured default timeout if `timeout` is None.
    pub async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Option<Duration>,
    ) -> Result<Element<'_>> {
        let timeout = timeout.unwrap_or_else(|| self.default_timeout());

        debug!("Waiting for element: {} (timeout: {:?})", selector, timeout);

        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_e| TrawlError::Timeout(format!("element {}", selector)))
    }

    /// Wait for an element located by XPath, bounded by `timeout`
    pub async fn wait_for_xpath(
        &self,
        xpath: &str,
        timeout: Option<Duration>,
    ) -> Result<Element<'_>> {
        let timeout = timeout.unwrap_or_else(|| self.default_timeout());

        debug!("Waiting for xpath: {} (timeout: {:?})", xpath, timeout);

        self.tab
            .wait_for_xpath_with_custom_timeout(xpath, timeout)
            .map_err(|_e| TrawlError::Timeout(format!("xpath {}", xpath)))
    }

    /// Execute JavaScript in the page context
    pub async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript: {}", script);

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| TrawlError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get the live URL of the current page
    pub async fn current_url(&self) -> Result<String> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Wait until the live URL contains `needle`, bounded by `timeout`
    ///
    /// Substring match: an intermediate redirect already on the target host
    /// satisfies it before the final page has loaded.
    pub async fn wait_for_url_contains(&self, needle: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            let url = self.current_url().await?;
            if url.contains(needle) {
                debug!("URL condition met: {} contains {}", url, needle);
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(TrawlError::Timeout(format!("url containing {}", needle)));
            }
            tokio::time::sleep(URL_POLL_INTERVAL).await;
        }
    }

    /// Capture a full-page PNG screenshot and write it to `path`
    pub async fn save_screenshot(&self, path: &Path) -> Result<()> {
        let data = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| TrawlError::Browser(format!("Screenshot capture failed: {}", e)))?;

        std::fs::write(path, data)?;
        info!("Screenshot saved to {}", path.display());
        Ok(())
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        // Browser is dropped here and the child process cleaned up
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser will be cleaned up");
    }
}

/// Read a single HTML attribute from an element
///
/// Returns None when the element has no attributes or the name is absent.
pub fn attribute(element: &Element<'_>, name: &str) -> Option<String> {
    let attributes = element.get_attributes().ok()??;
    attributes
        .chunks_exact(2)
        .find(|pair| pair[0] == name)
        .map(|pair| pair[1].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 1080);
        assert!(!config.sandbox);
        assert_eq!(config.timeout_seconds, 40);
    }

    #[test]
    fn test_custom_config() {
        let config = BrowserConfig {
            headless: false,
            window_width: 1024,
            window_height: 768,
            sandbox: true,
            timeout_seconds: 60,
        };

        assert!(!config.headless);
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.timeout_seconds, 60);
    }
}
