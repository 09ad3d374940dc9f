//! Description templating.
//!
//! The pipeline treats the renderer as a pure function from named fields
//! to an HTML string, behind [`DescriptionRenderer`] so tests can swap in
//! a failing or recording implementation. [`HtmlTemplates`] carries the
//! two shapes the supported sites use.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::app::Result;

/// Which built-in description shape an adapter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    /// Cover image, title, summary, author/category/tag lines.
    Standard,
    /// One localized line naming the update and its publish date.
    Announcement,
}

/// Normalized inputs to the description template.
#[derive(Debug, Clone, Default)]
pub struct TemplateFields {
    pub cover: String,
    pub title: String,
    pub description: String,
    pub category: Vec<String>,
    pub author: String,
    pub tags: Vec<String>,
    /// The source's own date text, before normalization.
    pub pub_date_text: String,
}

pub trait DescriptionRenderer: Send + Sync {
    fn render(&self, template: TemplateId, fields: &TemplateFields) -> Result<String>;
}

/// Built-in HTML renderer. All field text is escaped.
#[derive(Debug, Clone, Default)]
pub struct HtmlTemplates;

impl DescriptionRenderer for HtmlTemplates {
    fn render(&self, template: TemplateId, fields: &TemplateFields) -> Result<String> {
        Ok(match template {
            TemplateId::Standard => render_standard(fields),
            TemplateId::Announcement => render_announcement(fields),
        })
    }
}

fn render_standard(fields: &TemplateFields) -> String {
    let mut html = String::new();
    if !fields.cover.is_empty() {
        html.push_str(&format!(
            r#"<img src="{}">"#,
            encode_double_quoted_attribute(&fields.cover)
        ));
    }
    html.push_str(&format!("<h3>{}</h3>", encode_text(&fields.title)));
    if !fields.description.is_empty() {
        html.push_str(&format!("<p>{}</p>", encode_text(&fields.description)));
    }
    if !fields.author.is_empty() {
        html.push_str(&format!("<p>作者：{}</p>", encode_text(&fields.author)));
    }
    if !fields.category.is_empty() {
        html.push_str(&format!(
            "<p>分類：{}</p>",
            encode_text(&fields.category.join("、"))
        ));
    }
    if !fields.tags.is_empty() {
        html.push_str(&format!(
            "<p>標籤：{}</p>",
            encode_text(&fields.tags.join("、"))
        ));
    }
    html
}

fn render_announcement(fields: &TemplateFields) -> String {
    format!(
        "幣安 API 更新：{}  (發布日期：{})",
        encode_text(&fields.title),
        encode_text(&fields.pub_date_text)
    )
}
