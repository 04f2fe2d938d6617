//! Multi-step login flow with bounded retry
//!
//! One attempt walks the credential form step by step: username, submit,
//! password, submit, an optional verification button, then a URL-based
//! success wait. Any failure inside an attempt aborts it; attempts are
//! retried with a fixed delay up to the caller's bound, and exhaustion
//! surfaces the last error unchanged.

use headless_chrome::Element;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};
use trawl_browser::BrowserSession;
use trawl_core::{Result, Settings, TrawlError};

/// Wait bound for the main flow steps (fields, submit, success URL).
const LOGIN_STEP_TIMEOUT: Duration = Duration::from_secs(40);

/// Wait bound for the optional verification button. Much shorter than the
/// main steps: absence is the common case, not an error.
const VERIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed delay between failed attempts.
const RETRY_DELAY: Duration = Duration::from_secs(5);

const USERNAME_FIELD: &str = "input[data-testid=\"username\"]";
const PASSWORD_FIELD: &str = "#password";
const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";
const VERIFICATION_BUTTON: &str = "//button[contains(., 'Verify') or contains(., 'Continue')]";

/// Log in, retrying up to `max_attempts` times.
pub async fn login(
    session: &BrowserSession,
    settings: &Settings,
    max_attempts: usize,
) -> Result<()> {
    run_attempts(max_attempts, RETRY_DELAY, |_attempt| {
        single_attempt(session, settings)
    })
    .await
}

/// Run `attempt` up to `max_attempts` times, sleeping `retry_delay`
/// between failures. The first success wins; exhaustion returns the last
/// attempt's error unchanged.
pub(crate) async fn run_attempts<F, Fut>(
    max_attempts: usize,
    retry_delay: Duration,
    mut attempt: F,
) -> Result<()>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut last_error = None;

    for number in 1..=max_attempts {
        info!("Login attempt {} of {}", number, max_attempts);
        match attempt(number).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!("Login attempt {} failed: {}", number, e);
                last_error = Some(e);
                if number < max_attempts {
                    info!("Retrying in {:?}", retry_delay);
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| TrawlError::Other("no login attempts were made".to_string())))
}

async fn single_attempt(session: &BrowserSession, settings: &Settings) -> Result<()> {
    session.navigate(&settings.login_url).await?;

    debug!("Waiting for username field");
    let username = session
        .wait_for_element(USERNAME_FIELD, Some(LOGIN_STEP_TIMEOUT))
        .await?;
    clear_and_type(&username, &settings.username)?;
    submit(session).await?;

    debug!("Waiting for password field");
    let password = session
        .wait_for_element(PASSWORD_FIELD, Some(LOGIN_STEP_TIMEOUT))
        .await?;
    clear_and_type(&password, &settings.password)?;
    submit(session).await?;

    handle_optional_verification(session).await?;

    debug!("Waiting for the site host in the URL");
    session
        .wait_for_url_contains(&settings.success_host(), LOGIN_STEP_TIMEOUT)
        .await?;
    info!("Logged in, current URL: {}", session.current_url().await?);

    Ok(())
}

async fn submit(session: &BrowserSession) -> Result<()> {
    let button = session
        .wait_for_element(SUBMIT_BUTTON, Some(LOGIN_STEP_TIMEOUT))
        .await?;
    button
        .click()
        .map_err(|e| TrawlError::Browser(format!("Submit click failed: {}", e)))?;
    Ok(())
}

/// Click through an extra verification step if one appears.
///
/// Only the button's absence within the short wait is tolerated; a button
/// that is present but cannot be clicked fails the attempt.
async fn handle_optional_verification(session: &BrowserSession) -> Result<()> {
    debug!("Checking for extra verification step");
    match session
        .wait_for_xpath(VERIFICATION_BUTTON, Some(VERIFICATION_TIMEOUT))
        .await
    {
        Ok(button) => {
            button
                .click()
                .map_err(|e| TrawlError::Browser(format!("Verification click failed: {}", e)))?;
            info!("Extra verification step clicked");
            Ok(())
        }
        Err(TrawlError::Timeout(_)) => {
            debug!("No extra verification step detected");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn clear_and_type(element: &Element<'_>, text: &str) -> Result<()> {
    element
        .call_js_fn("function() { this.value = ''; }", vec![], false)
        .map_err(|e| TrawlError::Browser(format!("Failed to clear field: {}", e)))?;
    element
        .click()
        .map_err(|e| TrawlError::Browser(format!("Failed to focus field: {}", e)))?;
    element
        .type_into(text)
        .map_err(|e| TrawlError::Browser(format!("Failed to type into field: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_second_attempt_succeeds_after_one_delay() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in = calls.clone();
        let started = tokio::time::Instant::now();

        let result = run_attempts(2, Duration::from_secs(5), move |_n| {
            let calls = calls_in.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(TrawlError::Other("simulated failure".to_string()))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // Paused clock only advances through the retry sleep.
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_last_error() {
        let result = run_attempts(2, Duration::ZERO, |n| async move {
            Err::<(), _>(TrawlError::Other(format!("attempt {} failed", n)))
        })
        .await;

        match result {
            Err(TrawlError::Other(message)) => assert_eq!(message, "attempt 2 failed"),
            other => panic!("expected the final attempt's error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_skips_delay() {
        let started = tokio::time::Instant::now();
        let result = run_attempts(3, Duration::from_secs(60), |_n| async { Ok(()) }).await;
        assert!(result.is_ok());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_zero_attempts_reports_nothing_ran() {
        let result = run_attempts(0, Duration::ZERO, |_n| async { Ok(()) }).await;
        assert!(matches!(result, Err(TrawlError::Other(_))));
    }
}
