use serde::{Deserialize, Serialize};

use crate::domain::Item;

/// The assembled output of one adapter invocation.
///
/// `items` keeps the document order of the matched candidate nodes in the
/// rendered snapshot; the pipeline never re-sorts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    /// The entry URL that was actually fetched.
    pub link: String,
    /// When false, a zero-item extraction is a reportable failure and no
    /// Feed value is produced.
    pub allow_empty: bool,
    pub items: Vec<Item>,
}

impl Feed {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.link
        } else {
            &self.title
        }
    }
}
