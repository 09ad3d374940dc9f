use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized feed entry produced by an adapter.
///
/// An `Item` is only ever constructed after the extraction engine has
/// verified that `title`, `link`, and every field the adapter marks as
/// required are non-empty. `pub_date` stays `None` when the source text
/// carried no recognizable date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    /// Absolute URL of the entry.
    pub link: String,
    pub pub_date: Option<DateTime<Utc>>,
    /// Rendered HTML description.
    pub description: String,
    /// Categories in source order; duplicates are preserved.
    pub category: Vec<String>,
    pub author: String,
    /// Cover image URL; empty when the source exposes none.
    pub cover: String,
}

impl Item {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Item {
        Item {
            title: "My Article".into(),
            link: "https://example.com/a/1".into(),
            pub_date: None,
            description: String::new(),
            category: vec![],
            author: String::new(),
            cover: String::new(),
        }
    }

    #[test]
    fn test_display_title_with_title() {
        assert_eq!(sample().display_title(), "My Article");
    }

    #[test]
    fn test_display_title_without_title() {
        let mut item = sample();
        item.title.clear();
        assert_eq!(item.display_title(), "(Untitled)");
    }
}
