//! Declarative per-site adapters.
//!
//! An [`AdapterConfig`] is pure configuration: where a site's listing page
//! lives, how to tell that its dynamic content has finished rendering, and
//! which selectors map to which item fields. One shared engine
//! ([`crate::extract`] driven by [`crate::pipeline`]) consumes every
//! adapter, so supporting a new site means adding a config, not code.

pub mod sites;

use url::Url;

use crate::template::TemplateId;

pub use sites::{find, registry};

/// The named fields an extraction rule can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Link,
    PubDate,
    Description,
    Category,
    Author,
    Cover,
}

/// How to read a value out of the first (or, for list fields, every)
/// node matching a rule's selector.
#[derive(Debug, Clone)]
pub enum ExtractMode {
    /// Trimmed text content.
    Text,
    /// A named attribute, e.g. `href` or `src`.
    Attr(String),
    /// A URL literal embedded in the inline `style` attribute,
    /// e.g. `background-image: url('…')`.
    StyleUrl,
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub selector: String,
    pub mode: ExtractMode,
}

impl FieldRule {
    pub fn text(selector: &str) -> Self {
        Self {
            selector: selector.into(),
            mode: ExtractMode::Text,
        }
    }

    pub fn attr(selector: &str, name: &str) -> Self {
        Self {
            selector: selector.into(),
            mode: ExtractMode::Attr(name.into()),
        }
    }

    pub fn style_url(selector: &str) -> Self {
        Self {
            selector: selector.into(),
            mode: ExtractMode::StyleUrl,
        }
    }
}

/// Sub-selectors evaluated against each candidate node's subtree.
///
/// `title` and `link` are mandatory for every adapter; the rest are
/// per-site. `pub_time` covers layouts that keep the date and the time in
/// sibling nodes: its text is appended to the `pub_date` text before date
/// normalization. `tags` feeds the description template only and never
/// becomes an [`crate::domain::Item`] field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub title: FieldRule,
    pub link: FieldRule,
    pub pub_date: Option<FieldRule>,
    pub pub_time: Option<FieldRule>,
    pub description: Option<FieldRule>,
    pub category: Option<FieldRule>,
    pub author: Option<FieldRule>,
    pub cover: Option<FieldRule>,
    pub tags: Option<FieldRule>,
}

/// Immutable description of how to scrape one site. Loaded once at startup
/// and read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub site_id: String,
    pub feed_title: String,
    pub base_url: Url,
    /// May contain a `{page}` placeholder for paginated listings.
    pub entry_url: String,
    pub default_page: Option<u32>,
    /// DOM marker proving the dynamic content has loaded.
    pub readiness_selector: String,
    /// Scroll to the bottom before the readiness wait, for lazy-loaded lists.
    pub requires_pre_scroll: bool,
    pub timeout_ms: u64,
    /// Present a fixed realistic browser fingerprint (user-agent, viewport).
    pub anti_crawler_hardening: bool,
    /// Locates candidate item nodes; their document order is the feed order.
    pub item_selector: String,
    pub field_rules: FieldRules,
    /// Fields that must be non-empty after normalization or the candidate
    /// is dropped. `title` and `link` are always required.
    pub required_fields: Vec<ItemField>,
    pub allow_empty: bool,
    pub template: TemplateId,
}

impl AdapterConfig {
    pub fn requires(&self, field: ItemField) -> bool {
        self.required_fields.contains(&field)
    }

    /// Resolve the entry URL for one invocation, substituting the `{page}`
    /// placeholder from the request parameter, the adapter default, or 1.
    pub fn resolve_entry_url(&self, page: Option<u32>) -> String {
        if self.entry_url.contains("{page}") {
            let page = page.or(self.default_page).unwrap_or(1);
            self.entry_url.replace("{page}", &page.to_string())
        } else {
            self.entry_url.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paged_adapter() -> AdapterConfig {
        let mut adapter = sites::find("hbrtaiwan").unwrap().clone();
        adapter.entry_url = "https://example.test/latest?page={page}".into();
        adapter.default_page = Some(5);
        adapter
    }

    #[test]
    fn test_resolve_entry_url_with_param() {
        let adapter = paged_adapter();
        assert_eq!(
            adapter.resolve_entry_url(Some(2)),
            "https://example.test/latest?page=2"
        );
    }

    #[test]
    fn test_resolve_entry_url_uses_default_page() {
        let adapter = paged_adapter();
        assert_eq!(
            adapter.resolve_entry_url(None),
            "https://example.test/latest?page=5"
        );
    }

    #[test]
    fn test_resolve_entry_url_fixed() {
        let adapter = sites::find("inside").unwrap();
        assert_eq!(adapter.resolve_entry_url(Some(3)), adapter.entry_url);
    }

    #[test]
    fn test_requires_always_includes_configured_fields() {
        let adapter = sites::find("inside").unwrap();
        assert!(adapter.requires(ItemField::Category));
        assert!(!adapter.requires(ItemField::Author));
    }
}
