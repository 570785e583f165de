//! Classification of a card's style and script resources.
//!
//! Style entries are either inline CSS text or stylesheet URLs. The split is
//! recomputed on every render; it is pure, so the same entries always produce
//! the same [`ClassifiedResources`].

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Optional scheme, optional `www.`-style subdomain, any path, `.css`, optional query.
static STYLESHEET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(w{3}.)?.*\.css(\?.*)?$").expect("stylesheet pattern is valid")
});

/// Separator appended after every inline fragment.
pub const INLINE_SEPARATOR: &str = "\n\n";

/// How one style entry is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleEntry<'a> {
    /// Raw CSS to place in the inline `<style>` block.
    Inline(&'a str),
    /// URL to reference through a `<link rel="stylesheet">`.
    Stylesheet(&'a str),
    /// Not text; ignored.
    Dropped,
}

impl<'a> StyleEntry<'a> {
    pub fn classify(entry: &'a Value) -> Self {
        match entry.as_str() {
            Some(text) if is_stylesheet_url(text) => StyleEntry::Stylesheet(text),
            Some(text) => StyleEntry::Inline(text),
            None => StyleEntry::Dropped,
        }
    }
}

/// Style entries split into inline text and stylesheet references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedResources {
    /// Inline fragments in order, each followed by [`INLINE_SEPARATOR`].
    pub inline_css: String,
    /// Stylesheet URLs in input order.
    pub stylesheets: Vec<String>,
    /// Number of non-textual entries ignored.
    pub dropped: usize,
}

impl ClassifiedResources {
    pub fn has_inline(&self) -> bool {
        !self.inline_css.is_empty()
    }
}

/// Whether `text` references an external stylesheet.
pub fn is_stylesheet_url(text: &str) -> bool {
    STYLESHEET_URL.is_match(text)
}

/// Partition style entries. `None` yields empty output.
pub fn classify_styles(entries: Option<&[Value]>) -> ClassifiedResources {
    let mut classified = ClassifiedResources::default();
    for entry in entries.unwrap_or_default() {
        match StyleEntry::classify(entry) {
            StyleEntry::Inline(text) => {
                classified.inline_css.push_str(text);
                classified.inline_css.push_str(INLINE_SEPARATOR);
            }
            StyleEntry::Stylesheet(url) => classified.stylesheets.push(url.to_string()),
            StyleEntry::Dropped => classified.dropped += 1,
        }
    }
    if classified.dropped > 0 {
        tracing::debug!("Dropped {} non-text style entries", classified.dropped);
    }
    classified
}

/// Script URLs in order; non-text entries are skipped.
pub fn script_sources(entries: Option<&[Value]>) -> Vec<&str> {
    entries
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_str)
        .collect()
}
