// ── Search + paginate for plain lists ──
//
// Users, service requests, deliveries and notifications have no filter
// panel; they reuse free-text search and the page window.

use super::page::{PageWindow, total_pages};
use super::search::{Searchable, matches_search};

/// One page of a searched list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub matched: usize,
    pub page: usize,
    pub total_pages: usize,
}

pub fn search_page<T: Searchable + Clone>(
    items: &[T],
    search: &str,
    window: PageWindow,
) -> ListPage<T> {
    let matched: Vec<&T> = items
        .iter()
        .filter(|item| matches_search(*item, search))
        .collect();
    let pages = total_pages(matched.len(), window.page_size());
    let window = window.clamped(pages);
    let rows = matched
        .get(window.range(matched.len()))
        .unwrap_or_default()
        .iter()
        .map(|item| (*item).clone())
        .collect();

    ListPage {
        rows,
        matched: matched.len(),
        page: window.page(),
        total_pages: pages,
    }
}
