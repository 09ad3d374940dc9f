//! Render session: turns one URL into a fully rendered DOM snapshot.
//!
//! The browser engine is a capability, not a library dependency.
//! [`PageDriver`] is the per-page interface, driven in a fixed sequence:
//! navigate, optional pre-scroll, readiness wait, capture.
//! [`RenderBackend`] opens one driver per invocation; the production
//! implementation is [`chrome::ChromeBackend`].
//!
//! The principal invariant lives in [`acquire_snapshot`]: every driver that
//! was opened is released exactly once, on the success path and on every
//! failure path. `release` takes the driver by value, so a second release
//! cannot compile.

pub mod chrome;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::app::Result;

pub use chrome::ChromeBackend;

/// Immutable rendered-markup payload plus the URL it was captured from.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    url: String,
    html: String,
}

impl RenderSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// When a rendered page counts as ready for extraction.
#[derive(Debug, Clone)]
pub struct ReadinessPolicy {
    /// DOM marker whose appearance proves the dynamic content has loaded.
    pub selector: String,
    pub timeout: Duration,
    /// Scroll to the bottom once before the readiness wait, to trigger
    /// lazy-loaded lists.
    pub pre_scroll: bool,
}

/// One live browser page. Implementations own the underlying browser
/// resources and free all of them in `release`.
#[async_trait]
pub trait PageDriver: Send {
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Resolve once `selector` matches, or fail with
    /// [`crate::app::FreshetError::ReadinessTimeout`] after `timeout`.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// The full rendered markup of the current document.
    async fn rendered_markup(&self) -> Result<String>;

    /// Tear down the page and every resource backing it. Consumes the
    /// driver; called exactly once per opened driver.
    async fn release(self) -> Result<()>;
}

/// Opens one [`PageDriver`] per pipeline invocation.
#[async_trait]
pub trait RenderBackend: Send + Sync {
    type Page: PageDriver;

    /// Open a fresh browser context. `hardening` requests a fixed realistic
    /// fingerprint (user-agent, viewport) instead of the automation default.
    async fn open(&self, hardening: bool) -> Result<Self::Page>;
}

/// Acquire a rendered snapshot of `url` under the given readiness policy.
///
/// The opened driver is released on every exit path; a failure during
/// release is logged but never masks the capture outcome.
pub async fn acquire_snapshot<B: RenderBackend>(
    backend: &B,
    url: &str,
    policy: &ReadinessPolicy,
    hardening: bool,
) -> Result<RenderSnapshot> {
    let page = backend.open(hardening).await?;
    let outcome = drive(&page, url, policy).await;
    if let Err(release_err) = page.release().await {
        warn!(url, error = %release_err, "failed to release browser context");
    }
    outcome
}

async fn drive<P: PageDriver>(
    page: &P,
    url: &str,
    policy: &ReadinessPolicy,
) -> Result<RenderSnapshot> {
    page.navigate(url).await?;
    if policy.pre_scroll {
        page.scroll_to_bottom().await?;
    }
    page.wait_for_selector(&policy.selector, policy.timeout)
        .await?;
    let html = page.rendered_markup().await?;
    debug!(url, bytes = html.len(), "captured rendered snapshot");
    Ok(RenderSnapshot::new(url, html))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Mock driver/backend shared by the render and pipeline tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::app::{FreshetError, Result};
    use crate::render::{PageDriver, RenderBackend};

    #[derive(Debug, Clone, Default)]
    pub struct MockBehavior {
        pub html: String,
        pub fail_navigation: bool,
        pub selector_never_appears: bool,
    }

    pub struct MockPage {
        behavior: MockBehavior,
        releases: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageDriver for MockPage {
        async fn navigate(&self, url: &str) -> Result<()> {
            if self.behavior.fail_navigation {
                return Err(FreshetError::Navigation {
                    url: url.into(),
                    reason: "connection refused".into(),
                });
            }
            Ok(())
        }

        async fn scroll_to_bottom(&self) -> Result<()> {
            Ok(())
        }

        async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
            if self.behavior.selector_never_appears {
                return Err(FreshetError::ReadinessTimeout {
                    selector: selector.into(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            Ok(())
        }

        async fn rendered_markup(&self) -> Result<String> {
            Ok(self.behavior.html.clone())
        }

        async fn release(self) -> Result<()> {
            self.releases.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    pub struct MockBackend {
        pub behavior: MockBehavior,
        pub releases: Arc<AtomicUsize>,
    }

    impl MockBackend {
        pub fn with_html(html: &str) -> Self {
            Self {
                behavior: MockBehavior {
                    html: html.into(),
                    ..Default::default()
                },
                releases: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn releases(&self) -> usize {
            self.releases.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderBackend for MockBackend {
        type Page = MockPage;

        async fn open(&self, _hardening: bool) -> Result<Self::Page> {
            Ok(MockPage {
                behavior: self.behavior.clone(),
                releases: self.releases.clone(),
            })
        }
    }
}
