// List response shapes.
//
// Paginated viewsets answer with `{count, next, previous, results}` while
// hand-written list views return a bare array. Both are decoded into one
// typed union here and normalised to `Vec<T>` before leaving the crate.

use serde::Deserialize;

/// A list endpoint response in either of its two wire shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    /// Plain JSON array.
    Bare(Vec<T>),
    /// Page-number pagination envelope.
    Paged(PagedList<T>),
}

/// Page-number pagination envelope.
#[derive(Debug, Deserialize)]
pub struct PagedList<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> ListEnvelope<T> {
    /// Absolute URL of the following page, when the server has more.
    pub fn next_page(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Paged(page) => page.next.as_deref().filter(|s| !s.is_empty()),
        }
    }

    /// Total item count reported by the server, if any.
    pub fn total(&self) -> Option<u64> {
        match self {
            Self::Bare(items) => u64::try_from(items.len()).ok(),
            Self::Paged(page) => page.count,
        }
    }

    /// Drop the envelope and keep the items.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Paged(page) => page.results,
        }
    }
}
