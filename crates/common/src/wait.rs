//! Explicit waits against DOM and management state

use std::future::Future;
use std::time::{Duration, Instant};

use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::config::TimeoutConfig;
use crate::error::{TestsuiteError, TestsuiteResult};

/// A polling wait with a fixed timeout
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    timeout: Duration,
    interval: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Short wait for client-side rendering
    pub fn gui(timeouts: &TimeoutConfig) -> Self {
        Self::new(timeouts.gui, timeouts.poll_interval)
    }

    /// Wait for a round trip to the server
    pub fn ajax(timeouts: &TimeoutConfig) -> Self {
        Self::new(timeouts.ajax, timeouts.poll_interval)
    }

    /// Wait for a management operation to be reflected in the UI
    pub fn model(timeouts: &TimeoutConfig) -> Self {
        Self::new(timeouts.model, timeouts.poll_interval)
    }

    pub fn page_load(timeouts: &TimeoutConfig) -> Self {
        Self::new(timeouts.page_load, timeouts.poll_interval)
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Polls `condition` until it yields `Ok(true)`.
    ///
    /// Errors from the condition count as "not yet": elements that are
    /// missing or stale right now may well be there on the next poll. The
    /// last error is kept for the timeout message.
    pub async fn until<F, Fut>(&self, description: &str, mut condition: F) -> TestsuiteResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TestsuiteResult<bool>>,
    {
        self.until_some(description, || {
            let check = condition();
            async move { check.await.map(|ok| ok.then_some(())) }
        })
        .await
    }

    /// Polls `lookup` until it yields `Ok(Some(_))` and returns the value.
    pub async fn until_some<T, F, Fut>(&self, description: &str, mut lookup: F) -> TestsuiteResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TestsuiteResult<Option<T>>>,
    {
        let start = Instant::now();
        let mut last_error: Option<String> = None;
        let mut attempts = 0usize;

        loop {
            attempts += 1;
            match lookup().await {
                Ok(Some(value)) => {
                    debug!("{} after {} attempt(s)", description, attempts);
                    return Ok(value);
                }
                Ok(None) => {}
                Err(e) => {
                    trace!("{}: {}", description, e);
                    last_error = Some(e.to_string());
                }
            }

            if start.elapsed() >= self.timeout {
                let reason = match last_error {
                    Some(e) => format!("{} ({:?}, last error: {})", description, self.timeout, e),
                    None => format!("{} ({:?})", description, self.timeout),
                };
                return Err(TestsuiteError::Timeout(reason));
            }

            sleep(self.interval).await;
        }
    }

    /// Waits until at least one element matches `by`.
    pub async fn element_present(&self, driver: &WebDriver, by: By) -> TestsuiteResult<WebElement> {
        let description = format!("element {:?} to be present", by);
        self.until_some(&description, || {
            let by = by.clone();
            async move { Ok::<_, TestsuiteError>(driver.find_all(by).await?.into_iter().next()) }
        })
        .await
    }

    pub async fn element_visible(&self, element: &WebElement) -> TestsuiteResult<()> {
        self.until("element to be visible", || async move {
            Ok::<_, TestsuiteError>(element.is_displayed().await?)
        })
        .await
    }

    /// Hidden includes detached: a stale element counts as hidden.
    pub async fn element_hidden(&self, element: &WebElement) -> TestsuiteResult<()> {
        self.until("element to be hidden", || async move {
            Ok::<_, TestsuiteError>(!element.is_displayed().await.unwrap_or(false))
        })
        .await
    }

    pub async fn element_has_class(&self, element: &WebElement, class: &str) -> TestsuiteResult<()> {
        let description = format!("element to have class '{}'", class);
        self.until(&description, || async move { has_class(element, class).await })
            .await
    }
}

/// Whether the `class` attribute of `element` contains `class`
pub async fn has_class(element: &WebElement, class: &str) -> TestsuiteResult<bool> {
    let classes = element.attr("class").await?.unwrap_or_default();
    Ok(classes.split_whitespace().any(|c| c == class))
}
