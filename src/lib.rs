//! # Freshet
//!
//! Turns the live, rendered state of third-party web pages into normalized
//! syndication feed items. Each site that only reveals its content under
//! full browser execution is described declaratively as one [`adapter`]
//! config; a single shared engine does the rest.
//!
//! ## Architecture
//!
//! ```text
//! AdapterConfig → Render Session → Extraction Engine → Templates → Feed
//! ```
//!
//! - [`render`]: acquires a fully rendered DOM snapshot via headless Chrome,
//!   with a guaranteed-release browser lifecycle
//! - [`extract`]: applies the adapter's selector ruleset to the snapshot
//! - [`normalize`]: date, URL, and tag-list normalization
//! - [`template`]: renders item descriptions to HTML
//! - [`pipeline`]: orchestrates one stateless invocation end to end
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use freshet::pipeline::{AdapterPipeline, RequestParams};
//! use freshet::render::ChromeBackend;
//! use freshet::template::HtmlTemplates;
//!
//! let backend = ChromeBackend::new(Default::default());
//! let pipeline = AdapterPipeline::new(backend, HtmlTemplates);
//! let feed = pipeline.run_site("inside", &RequestParams::default()).await?;
//! ```

/// Error types and the crate-wide `Result` alias.
pub mod app;

/// Declarative per-site adapters and the built-in registry.
pub mod adapter;

/// Command-line interface definitions.
pub mod cli;

/// Runtime configuration loaded from `~/.config/freshet/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Feed`](domain::Feed): one adapter invocation's output
/// - [`Item`](domain::Item): a normalized feed entry
pub mod domain;

/// Extraction engine: declarative ruleset → validated items.
pub mod extract;

/// Pure field normalizers (dates, URLs, tag lists).
pub mod normalize;

/// Adapter pipeline orchestrating one invocation.
pub mod pipeline;

/// Render session: rendered DOM snapshots via headless Chrome, behind
/// capability traits so tests can substitute a mock browser.
pub mod render;

/// Description templating.
pub mod template;
