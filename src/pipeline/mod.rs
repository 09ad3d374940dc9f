//! Adapter pipeline: one end-to-end invocation per request.
//!
//! `run` walks the fixed sequence: resolve entry URL, acquire a rendered
//! snapshot, extract items, render descriptions, assemble the feed. Every
//! invocation is stateless and owns its own browser context; retries, if
//! any, are a fresh invocation issued by the caller.

use std::time::Duration;

use tracing::{info, warn};

use crate::adapter::{self, AdapterConfig};
use crate::app::{FreshetError, Result};
use crate::domain::{Feed, Item};
use crate::extract;
use crate::render::{self, ReadinessPolicy, RenderBackend};
use crate::template::{DescriptionRenderer, TemplateFields};

/// Caller-supplied knobs for one invocation.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    /// Overrides the adapter's default page for paginated listings.
    pub page: Option<u32>,
}

pub struct AdapterPipeline<B, R> {
    backend: B,
    renderer: R,
}

impl<B, R> AdapterPipeline<B, R>
where
    B: RenderBackend,
    R: DescriptionRenderer,
{
    pub fn new(backend: B, renderer: R) -> Self {
        Self { backend, renderer }
    }

    /// Look up a registered adapter by site id and run it.
    pub async fn run_site(&self, site_id: &str, params: &RequestParams) -> Result<Feed> {
        let config = adapter::find(site_id)
            .ok_or_else(|| FreshetError::AdapterNotFound(site_id.to_string()))?;
        self.run(config, params).await
    }

    /// One full invocation: snapshot → items → descriptions → feed.
    pub async fn run(&self, config: &AdapterConfig, params: &RequestParams) -> Result<Feed> {
        let entry_url = config.resolve_entry_url(params.page);
        info!(site_id = %config.site_id, url = %entry_url, "running adapter");

        let policy = ReadinessPolicy {
            selector: config.readiness_selector.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            pre_scroll: config.requires_pre_scroll,
        };
        let snapshot = render::acquire_snapshot(
            &self.backend,
            &entry_url,
            &policy,
            config.anti_crawler_hardening,
        )
        .await?;

        let extracted = extract::extract(&snapshot, config)?;

        let mut items: Vec<Item> = Vec::with_capacity(extracted.len());
        for entry in extracted {
            let fields = TemplateFields {
                cover: entry.item.cover.clone(),
                title: entry.item.title.clone(),
                description: entry.item.description.clone(),
                category: entry.item.category.clone(),
                author: entry.item.author.clone(),
                tags: entry.tags,
                pub_date_text: entry.pub_date_text,
            };
            match self.renderer.render(config.template, &fields) {
                Ok(description) => {
                    let mut item = entry.item;
                    item.description = description;
                    items.push(item);
                }
                // A template failure is isolated to the one item.
                Err(e) => warn!(
                    site_id = %config.site_id,
                    link = %entry.item.link,
                    error = %e,
                    "description template failed, dropping item"
                ),
            }
        }

        if items.is_empty() && !config.allow_empty {
            return Err(FreshetError::EmptyResult {
                site_id: config.site_id.clone(),
            });
        }

        info!(site_id = %config.site_id, items = items.len(), "assembled feed");
        Ok(Feed {
            title: config.feed_title.clone(),
            link: entry_url,
            allow_empty: config.allow_empty,
            items,
        })
    }
}
