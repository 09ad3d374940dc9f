//! Extraction engine: applies an adapter's declarative ruleset to a
//! rendered snapshot.
//!
//! Pure with respect to the snapshot: no I/O, deterministic output, and
//! candidate handles never escape this module. Candidates missing a
//! required field are dropped silently; only a broken selector in the
//! ruleset is an invocation-level error.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::adapter::{AdapterConfig, ExtractMode, FieldRule, FieldRules, ItemField};
use crate::app::{FreshetError, Result};
use crate::domain::Item;
use crate::normalize;
use crate::render::RenderSnapshot;

/// URL literal inside an inline style, e.g. `background-image: url('…')`.
static STYLE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("valid regex"));

/// A validated item plus the template-only inputs that never become
/// [`Item`] fields.
#[derive(Debug, Clone)]
pub struct Extracted {
    /// `description` still holds the raw summary text here; the pipeline
    /// replaces it with the rendered template output.
    pub item: Item,
    pub tags: Vec<String>,
    /// The source's own date text, kept for templates that echo it.
    pub pub_date_text: String,
}

/// Locate every candidate node matching the adapter's item selector, in
/// document order, and turn the valid ones into items.
pub fn extract(snapshot: &RenderSnapshot, adapter: &AdapterConfig) -> Result<Vec<Extracted>> {
    let document = Html::parse_document(snapshot.html());
    let item_selector = compile(&adapter.item_selector)?;
    let rules = CompiledRules::new(&adapter.field_rules)?;

    let mut items = Vec::new();
    let mut dropped = 0usize;
    for candidate in document.select(&item_selector) {
        match evaluate(candidate, &rules, adapter) {
            Some(extracted) => items.push(extracted),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(
            site_id = %adapter.site_id,
            dropped,
            kept = items.len(),
            "dropped candidates missing required fields"
        );
    }
    Ok(items)
}

struct CompiledRule {
    selector: Selector,
    mode: ExtractMode,
}

impl CompiledRule {
    fn new(rule: &FieldRule) -> Result<Self> {
        Ok(Self {
            selector: compile(&rule.selector)?,
            mode: rule.mode.clone(),
        })
    }
}

struct CompiledRules {
    title: CompiledRule,
    link: CompiledRule,
    pub_date: Option<CompiledRule>,
    pub_time: Option<CompiledRule>,
    description: Option<CompiledRule>,
    category: Option<CompiledRule>,
    author: Option<CompiledRule>,
    cover: Option<CompiledRule>,
    tags: Option<CompiledRule>,
}

impl CompiledRules {
    fn new(rules: &FieldRules) -> Result<Self> {
        let compile_opt = |rule: &Option<FieldRule>| -> Result<Option<CompiledRule>> {
            rule.as_ref().map(CompiledRule::new).transpose()
        };
        Ok(Self {
            title: CompiledRule::new(&rules.title)?,
            link: CompiledRule::new(&rules.link)?,
            pub_date: compile_opt(&rules.pub_date)?,
            pub_time: compile_opt(&rules.pub_time)?,
            description: compile_opt(&rules.description)?,
            category: compile_opt(&rules.category)?,
            author: compile_opt(&rules.author)?,
            cover: compile_opt(&rules.cover)?,
            tags: compile_opt(&rules.tags)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| FreshetError::Selector {
        selector: selector.into(),
        reason: e.to_string(),
    })
}

fn evaluate(
    candidate: ElementRef<'_>,
    rules: &CompiledRules,
    adapter: &AdapterConfig,
) -> Option<Extracted> {
    let title = first_value(candidate, &rules.title).unwrap_or_default();
    let link = first_value(candidate, &rules.link)
        .and_then(|raw| normalize::absolutize(&adapter.base_url, &raw))
        .unwrap_or_default();

    let mut pub_date_text = rules
        .pub_date
        .as_ref()
        .and_then(|rule| first_value(candidate, rule))
        .unwrap_or_default();
    // Sibling time node, appended before date normalization.
    if let Some(time_text) = rules
        .pub_time
        .as_ref()
        .and_then(|rule| first_value(candidate, rule))
    {
        if pub_date_text.is_empty() {
            pub_date_text = time_text;
        } else {
            pub_date_text = format!("{pub_date_text} {time_text}");
        }
    }
    let pub_date = normalize::parse_date(&pub_date_text);

    let description = rules
        .description
        .as_ref()
        .and_then(|rule| first_value(candidate, rule))
        .unwrap_or_default();
    let category = rules
        .category
        .as_ref()
        .map(|rule| normalize::split_list(all_texts(candidate, rule)))
        .unwrap_or_default();
    let author = rules
        .author
        .as_ref()
        .map(|rule| all_texts(candidate, rule).join(", "))
        .unwrap_or_default();
    let cover = rules
        .cover
        .as_ref()
        .and_then(|rule| first_value(candidate, rule))
        .and_then(|raw| normalize::absolutize(&adapter.base_url, &raw))
        .unwrap_or_default();
    let tags = rules
        .tags
        .as_ref()
        .map(|rule| normalize::split_list(all_texts(candidate, rule)))
        .unwrap_or_default();

    if title.is_empty() || link.is_empty() {
        return None;
    }
    for field in &adapter.required_fields {
        let missing = match field {
            ItemField::Title => title.is_empty(),
            ItemField::Link => link.is_empty(),
            ItemField::PubDate => pub_date.is_none(),
            ItemField::Description => description.is_empty(),
            ItemField::Category => category.is_empty(),
            ItemField::Author => author.is_empty(),
            ItemField::Cover => cover.is_empty(),
        };
        if missing {
            return None;
        }
    }

    Some(Extracted {
        item: Item {
            title,
            link,
            pub_date,
            description,
            category,
            author,
            cover,
        },
        tags,
        pub_date_text,
    })
}

/// Read one value from the first node matching the rule's selector.
fn first_value(candidate: ElementRef<'_>, rule: &CompiledRule) -> Option<String> {
    let node = candidate.select(&rule.selector).next()?;
    let value = match &rule.mode {
        ExtractMode::Text => text_of(node),
        ExtractMode::Attr(name) => node.value().attr(name)?.trim().to_string(),
        ExtractMode::StyleUrl => {
            let style = node.value().attr("style")?;
            STYLE_URL.captures(style)?[1].trim().to_string()
        }
    };
    (!value.is_empty()).then_some(value)
}

/// Trimmed text of every node matching the rule's selector, in document
/// order. List-valued fields (category, author, tags) read all matches.
fn all_texts(candidate: ElementRef<'_>, rule: &CompiledRule) -> Vec<String> {
    candidate
        .select(&rule.selector)
        .map(text_of)
        .filter(|text| !text.is_empty())
        .collect()
}

fn text_of(node: ElementRef<'_>) -> String {
    node.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::FieldRule;
    use crate::template::TemplateId;
    use chrono::{TimeZone, Utc};
    use url::Url;

    fn test_adapter() -> AdapterConfig {
        AdapterConfig {
            site_id: "fixture".into(),
            feed_title: "Fixture".into(),
            base_url: Url::parse("https://example.test").unwrap(),
            entry_url: "https://example.test/list".into(),
            default_page: None,
            readiness_selector: ".entry".into(),
            requires_pre_scroll: false,
            timeout_ms: 1000,
            anti_crawler_hardening: false,
            item_selector: ".entry".into(),
            field_rules: FieldRules {
                title: FieldRule::text("h2 a"),
                link: FieldRule::attr("h2 a", "href"),
                pub_date: Some(FieldRule::text(".date")),
                pub_time: None,
                description: Some(FieldRule::text("p.sum")),
                category: Some(FieldRule::text(".tag")),
                author: Some(FieldRule::text(".author")),
                cover: Some(FieldRule::style_url(".cover")),
                tags: None,
            },
            required_fields: vec![],
            allow_empty: false,
            template: TemplateId::Standard,
        }
    }

    const FIXTURE: &str = r#"
        <html><body>
          <div class="entry">
            <div class="cover" style="background-image: url('/img/a.png')"></div>
            <h2><a href="/a/1">First</a></h2>
            <p class="sum">Summary one</p>
            <span class="date">2025/06/20</span>
            <span class="tag">科技</span><span class="tag">管理, 科技</span>
            <span class="author">Alice</span><span class="author">Bob</span>
          </div>
          <div class="entry">
            <h2><a href="https://other.test/b/2">Second</a></h2>
            <span class="date">not a date</span>
          </div>
          <div class="entry">
            <h2><a href="/c/3"></a></h2>
            <span class="date">2025/06/21</span>
          </div>
          <div class="entry">
            <h2><a href="/d/4">Fourth</a></h2>
          </div>
        </body></html>
    "#;

    fn snapshot() -> RenderSnapshot {
        RenderSnapshot::new("https://example.test/list", FIXTURE)
    }

    #[test]
    fn test_document_order_and_empty_title_drop() {
        let items = extract(&snapshot(), &test_adapter()).unwrap();
        // The third candidate has an empty title and is dropped.
        let titles: Vec<&str> = items.iter().map(|e| e.item.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second", "Fourth"]);
    }

    #[test]
    fn test_deterministic() {
        let adapter = test_adapter();
        let first = extract(&snapshot(), &adapter).unwrap();
        let second = extract(&snapshot(), &adapter).unwrap();
        let a: Vec<&Item> = first.iter().map(|e| &e.item).collect();
        let b: Vec<&Item> = second.iter().map(|e| &e.item).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_relative_link_resolved_absolute_passthrough() {
        let items = extract(&snapshot(), &test_adapter()).unwrap();
        assert_eq!(items[0].item.link, "https://example.test/a/1");
        assert_eq!(items[1].item.link, "https://other.test/b/2");
    }

    #[test]
    fn test_style_url_cover_resolved() {
        let items = extract(&snapshot(), &test_adapter()).unwrap();
        assert_eq!(items[0].item.cover, "https://example.test/img/a.png");
        assert_eq!(items[1].item.cover, "");
    }

    #[test]
    fn test_unparsable_date_degrades_to_absent() {
        let items = extract(&snapshot(), &test_adapter()).unwrap();
        assert_eq!(
            items[0].item.pub_date,
            Some(Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap())
        );
        assert_eq!(items[1].item.pub_date, None);
        assert_eq!(items[1].pub_date_text, "not a date");
    }

    #[test]
    fn test_required_pub_date_drops_candidate_instead() {
        let mut adapter = test_adapter();
        adapter.required_fields = vec![ItemField::PubDate];
        let items = extract(&snapshot(), &adapter).unwrap();
        let titles: Vec<&str> = items.iter().map(|e| e.item.title.as_str()).collect();
        assert_eq!(titles, ["First"]);
    }

    #[test]
    fn test_multi_node_category_split_keeps_order_and_duplicates() {
        let items = extract(&snapshot(), &test_adapter()).unwrap();
        assert_eq!(items[0].item.category, ["科技", "管理", "科技"]);
    }

    #[test]
    fn test_multi_node_author_joined() {
        let items = extract(&snapshot(), &test_adapter()).unwrap();
        assert_eq!(items[0].item.author, "Alice, Bob");
        assert_eq!(items[1].item.author, "");
    }

    #[test]
    fn test_invalid_selector_is_invocation_error() {
        let mut adapter = test_adapter();
        adapter.item_selector = "div[".into();
        let err = extract(&snapshot(), &adapter).unwrap_err();
        assert!(matches!(err, FreshetError::Selector { .. }));
    }

    #[test]
    fn test_no_candidates_is_empty_not_error() {
        let empty = RenderSnapshot::new("https://example.test/list", "<html><body></body></html>");
        let items = extract(&empty, &test_adapter()).unwrap();
        assert!(items.is_empty());
    }
}
