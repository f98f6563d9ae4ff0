//! Content pages and URL normalization.
//!
//! A [`Page`] is the unit of displayable content: a title shown above the slot
//! and a URL loaded inside it.  Pages are created by configuration edits and are
//! read-only to the allocation and rotation engine.

use serde::{Deserialize, Serialize};

/// Scheme prepended to URLs that do not already carry one.
const DEFAULT_SCHEME: &str = "https://";

/// A titled URL.
///
/// Duplicates are permitted; ordering is the insertion order from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    /// Label displayed above the content.  May be empty (legacy bare-URL lists).
    #[serde(default)]
    pub title: String,
    /// Address as entered by the user.  Use [`Page::normalized_url`] before loading.
    pub url: String,
}

impl Page {
    /// Creates a page from a title and a URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Creates a page with an empty title, as stored by the legacy `urls` schema.
    pub fn untitled(url: impl Into<String>) -> Self {
        Self::new(String::new(), url)
    }

    /// Returns the URL in the form handed to a renderer.
    ///
    /// See [`normalize_url`].
    pub fn normalized_url(&self) -> String {
        normalize_url(&self.url)
    }
}

/// Normalizes a user-entered URL.
///
/// Leading and trailing whitespace is trimmed, then `https://` is prepended
/// unless the string already starts with `http://` or `https://`.
///
/// The function is idempotent: normalizing an already-normalized URL returns
/// it unchanged.
///
/// # Example
///
/// ```
/// use signwall_core::normalize_url;
///
/// assert_eq!(normalize_url("example.com"), "https://example.com");
/// assert_eq!(normalize_url("  http://x "), "http://x");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{trimmed}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
