//! chromiumoxide-backed [`RenderBackend`].
//!
//! One browser process per invocation, mirroring how each request gets its
//! own context: launch, drive, then tear everything down in `release`.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::app::{FreshetError, Result};
use crate::config::BrowserSettings;
use crate::render::{PageDriver, RenderBackend};

/// Launches a fresh headless Chrome for every `open`.
pub struct ChromeBackend {
    settings: BrowserSettings,
}

impl ChromeBackend {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

/// A live Chrome page plus the browser process and handler task behind it.
pub struct ChromePage {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    settle: Duration,
    poll: Duration,
}

#[async_trait]
impl RenderBackend for ChromeBackend {
    type Page = ChromePage;

    async fn open(&self, hardening: bool) -> Result<Self::Page> {
        let mut builder = BrowserConfig::builder();
        for arg in &self.settings.chrome_args {
            builder = builder.arg(arg.clone());
        }
        if !self.settings.headless {
            builder = builder.with_head();
        }
        if hardening {
            builder = builder.window_size(
                self.settings.viewport_width,
                self.settings.viewport_height,
            );
        }

        let browser_config = builder
            .build()
            .map_err(|e| FreshetError::Browser(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            FreshetError::Browser(format!(
                "failed to launch browser: {e}. Is Chrome or Chromium installed and in PATH?"
            ))
        })?;

        let handler_task = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        // From here on a failure must not leak the browser process.
        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown(browser, handler_task).await;
                return Err(FreshetError::Browser(format!("failed to create page: {e}")));
            }
        };

        if hardening {
            if let Err(e) = page
                .set_user_agent(self.settings.hardened_user_agent.as_str())
                .await
            {
                shutdown(browser, handler_task).await;
                return Err(FreshetError::Browser(format!("failed to set user agent: {e}")));
            }
        }

        Ok(ChromePage {
            browser,
            page,
            handler_task,
            settle: self.settings.settle(),
            poll: self.settings.poll_interval(),
        })
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await.map_err(|e| FreshetError::Navigation {
            url: url.into(),
            reason: e.to_string(),
        })?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| FreshetError::Navigation {
                url: url.into(),
                reason: e.to_string(),
            })?;

        // Bounded settle delay standing in for a network-idle condition.
        sleep(self.settle).await;
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(|e| FreshetError::Browser(format!("scroll failed: {e}")))?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, wait: Duration) -> Result<()> {
        let appeared = async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return;
                }
                sleep(self.poll).await;
            }
        };
        timeout(wait, appeared)
            .await
            .map_err(|_| FreshetError::ReadinessTimeout {
                selector: selector.into(),
                timeout_ms: wait.as_millis() as u64,
            })
    }

    async fn rendered_markup(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| FreshetError::Browser(format!("failed to capture markup: {e}")))
    }

    async fn release(mut self) -> Result<()> {
        if let Err(e) = self.page.close().await {
            debug!(error = %e, "page close failed");
        }
        let closed = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        closed
            .map(|_| ())
            .map_err(|e| FreshetError::Browser(format!("failed to close browser: {e}")))
    }
}

async fn shutdown(mut browser: Browser, handler_task: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        debug!(error = %e, "browser close failed");
    }
    let _ = browser.wait().await;
    handler_task.abort();
}
