// ── Page window ──

use std::ops::Range;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// 1-based page number plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    page: usize,
    page_size: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Number of pages needed for `len` rows.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

impl PageWindow {
    /// A window on `page`; a zero page size is treated as 1.
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The same window moved to `page` and clamped into `[1, total]`.
    #[must_use]
    pub fn at(self, page: usize, total: usize) -> Self {
        Self {
            page: page.clamp(1, total.max(1)),
            ..self
        }
    }

    #[must_use]
    pub fn clamped(self, total: usize) -> Self {
        self.at(self.page, total)
    }

    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self::new(1, page_size)
    }

    /// Index range of this page within a list of `len` rows.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 25), 0);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn clamping_to_boundaries() {
        let w = PageWindow::new(1, 10);
        assert_eq!(w.at(0, 4).page(), 1);
        assert_eq!(w.at(9, 4).page(), 4);
        assert_eq!(w.at(3, 0).page(), 1);
    }

    #[test]
    fn last_page_range_is_short() {
        let w = PageWindow::new(3, 10);
        assert_eq!(w.range(25), 20..25);
        assert_eq!(PageWindow::new(1, 10).range(0), 0..0);
    }
}
