//! Built-in site adapters.
//!
//! Everything here is configuration: selectors, URLs, readiness markers,
//! and required-field policies for each supported site. Adding a site is a
//! matter of appending one more [`AdapterConfig`] to the registry.

use once_cell::sync::Lazy;
use url::Url;

use crate::adapter::{AdapterConfig, FieldRule, FieldRules, ItemField};
use crate::template::TemplateId;

fn base(url: &str) -> Url {
    Url::parse(url).expect("valid built-in base URL")
}

static REGISTRY: Lazy<Vec<AdapterConfig>> = Lazy::new(|| {
    vec![
        // 哈佛商業評論 latest-articles listing, paginated.
        AdapterConfig {
            site_id: "hbrtaiwan".into(),
            feed_title: "哈佛商業評論 - 最新文章".into(),
            base_url: base("https://www.hbrtaiwan.com"),
            entry_url: "https://www.hbrtaiwan.com/latest?page={page}".into(),
            default_page: Some(5),
            readiness_selector: ".articleItem".into(),
            requires_pre_scroll: false,
            timeout_ms: 10_000,
            anti_crawler_hardening: false,
            item_selector: ".articleItem".into(),
            field_rules: FieldRules {
                title: FieldRule::text("h3 a"),
                link: FieldRule::attr("h3 a", "href"),
                pub_date: Some(FieldRule::text(".clickItem li:last-child")),
                pub_time: None,
                description: Some(FieldRule::text(".heighP p a")),
                category: Some(FieldRule::text(".listItem li a")),
                author: Some(FieldRule::text(".listItem li:nth-child(3) a")),
                cover: Some(FieldRule::attr(".imgBox img", "src")),
                tags: None,
            },
            required_fields: vec![],
            allow_empty: false,
            template: TemplateId::Standard,
        },
        // 經理人 article listing; the list lazy-loads on scroll.
        AdapterConfig {
            site_id: "managertoday".into(),
            feed_title: "經理人 - 最新文章".into(),
            base_url: base("https://www.managertoday.com.tw"),
            entry_url: "https://www.managertoday.com.tw/articles".into(),
            default_page: None,
            readiness_selector: "div.text-left.flex.my-3".into(),
            requires_pre_scroll: true,
            timeout_ms: 10_000,
            anti_crawler_hardening: false,
            item_selector: "div.text-left.flex.my-3".into(),
            field_rules: FieldRules {
                title: FieldRule::text("h2.text-base"),
                link: FieldRule::attr(r#"a[href^="/articles/view"]"#, "href"),
                pub_date: Some(FieldRule::text("div.text-sm.text-black span:last-child")),
                pub_time: None,
                description: Some(FieldRule::text(r"p.hidden.xl\:block")),
                category: None,
                author: None,
                cover: Some(FieldRule::attr("img", "src")),
                tags: None,
            },
            required_fields: vec![],
            allow_empty: false,
            template: TemplateId::Standard,
        },
        // 創業小聚 article listing; also lazy-loaded.
        AdapterConfig {
            site_id: "meet".into(),
            feed_title: "創業小聚 - 最新文章".into(),
            base_url: base("https://meet.bnext.com.tw"),
            entry_url: "https://meet.bnext.com.tw/articles/list".into(),
            default_page: None,
            readiness_selector: "div.flex.items-center.gap-x-3".into(),
            requires_pre_scroll: true,
            timeout_ms: 10_000,
            anti_crawler_hardening: false,
            item_selector: "div.flex.items-center.gap-x-3".into(),
            field_rules: FieldRules {
                title: FieldRule::text("h2"),
                link: FieldRule::attr("a", "href"),
                pub_date: Some(FieldRule::text("span:last-child")),
                pub_time: None,
                description: Some(FieldRule::text("p")),
                category: None,
                author: None,
                cover: Some(FieldRule::attr("img", "src")),
                tags: None,
            },
            required_fields: vec![],
            allow_empty: false,
            template: TemplateId::Standard,
        },
        // INSIDE front page. The cover lives in an inline background-image
        // style, and listings without a category are skipped.
        AdapterConfig {
            site_id: "inside".into(),
            feed_title: "INSIDE - 最新文章".into(),
            base_url: base("https://www.inside.com.tw"),
            entry_url: "https://www.inside.com.tw".into(),
            default_page: None,
            readiness_selector: ".post_list_item".into(),
            requires_pre_scroll: false,
            timeout_ms: 10_000,
            anti_crawler_hardening: false,
            item_selector: ".post_list_item".into(),
            field_rules: FieldRules {
                title: FieldRule::text(".post_title a"),
                link: FieldRule::attr(".post_title a", "href"),
                pub_date: Some(FieldRule::text(".post_date span")),
                pub_time: None,
                description: Some(FieldRule::text(".post_description")),
                category: Some(FieldRule::text(".post_category")),
                author: Some(FieldRule::text(".post_author a")),
                cover: Some(FieldRule::style_url(".post_cover_inner")),
                tags: Some(FieldRule::text(".hero_slide_tag")),
            },
            required_fields: vec![ItemField::Category],
            allow_empty: false,
            template: TemplateId::Standard,
        },
        // 品牌癮 front page; no dates on the listing.
        AdapterConfig {
            site_id: "brandinlabs".into(),
            feed_title: "品牌癮 - 最新文章".into(),
            base_url: base("https://www.brandinlabs.com"),
            entry_url: "https://www.brandinlabs.com".into(),
            default_page: None,
            readiness_selector: "#uid_837a14a div.p-wrap".into(),
            requires_pre_scroll: false,
            timeout_ms: 10_000,
            anti_crawler_hardening: false,
            item_selector: "#uid_837a14a div.p-wrap".into(),
            field_rules: FieldRules {
                title: FieldRule::text("h4.entry-title a"),
                link: FieldRule::attr("h4.entry-title a", "href"),
                pub_date: None,
                pub_time: None,
                description: None,
                category: Some(FieldRule::text(".p-category")),
                author: None,
                cover: Some(FieldRule::attr(".featured-img", "src")),
                tags: None,
            },
            required_fields: vec![],
            allow_empty: false,
            template: TemplateId::Standard,
        },
        // Binance API announcement board; actively defends against
        // automation, so the hardened fingerprint is applied.
        AdapterConfig {
            site_id: "binance".into(),
            feed_title: "幣安 API 更新公告".into(),
            base_url: base("https://www.binance.com"),
            entry_url:
                "https://www.binance.com/zh-TC/support/announcement/%E5%B9%A3%E5%AE%89api%E6%9B%B4%E6%96%B0?c=51&navId=51"
                    .into(),
            default_page: None,
            readiness_selector: "div.bn-flex.w-full.flex-col.gap-4".into(),
            requires_pre_scroll: false,
            timeout_ms: 10_000,
            anti_crawler_hardening: true,
            item_selector: "div.bn-flex.w-full.flex-col.gap-4".into(),
            field_rules: FieldRules {
                title: FieldRule::text("h3.typography-body1-1"),
                link: FieldRule::attr("a", "href"),
                pub_date: Some(FieldRule::text(
                    r"div.typography-caption1.noH5\:typography-body1-1.text-TertiaryText.mobile\:text-SecondaryText",
                )),
                pub_time: None,
                description: None,
                category: None,
                author: None,
                cover: None,
                tags: None,
            },
            required_fields: vec![],
            allow_empty: false,
            template: TemplateId::Announcement,
        },
    ]
});

/// All built-in adapters, in registration order.
pub fn registry() -> &'static [AdapterConfig] {
    &REGISTRY
}

/// Look up one adapter by its site id.
pub fn find(site_id: &str) -> Option<&'static AdapterConfig> {
    REGISTRY.iter().find(|adapter| adapter.site_id == site_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_sites() {
        let ids: Vec<&str> = registry().iter().map(|a| a.site_id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "hbrtaiwan",
                "managertoday",
                "meet",
                "inside",
                "brandinlabs",
                "binance"
            ]
        );
    }

    #[test]
    fn test_find_known_and_unknown() {
        assert!(find("binance").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_only_binance_is_hardened() {
        for adapter in registry() {
            assert_eq!(
                adapter.anti_crawler_hardening,
                adapter.site_id == "binance"
            );
        }
    }

    #[test]
    fn test_entry_urls_share_their_base_host() {
        for adapter in registry() {
            let entry = Url::parse(&adapter.resolve_entry_url(None)).unwrap();
            assert_eq!(entry.host_str(), adapter.base_url.host_str());
        }
    }
}
