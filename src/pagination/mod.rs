//! Page cursor over the filtered result.
//!
//! Pages are 1-based. Zero results means zero pages; the cursor still reads 1 but there is no
//! page to show and [`page`] returns an empty slice.

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Number of pages needed for `count` records
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Slice out page `page_number` (1-based); out-of-range pages are empty
pub fn page<T>(items: &[T], page_number: usize, page_size: usize) -> &[T] {
    if page_number == 0 || page_size == 0 {
        return &[];
    }

    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Current page and fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
}

impl Paginator {
    /// Create a cursor on page 1. A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self { current_page: 1, page_size: page_size.max(1) }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.page_size)
    }

    /// Records on the current page
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        page(items, self.current_page, self.page_size)
    }

    /// Advance one page; no-op on the last page. Returns whether the cursor moved.
    pub fn next_page(&mut self, count: usize) -> bool {
        if self.current_page < self.total_pages(count) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; no-op on page 1. Returns whether the cursor moved.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a page, clamped to `1..=total_pages` (page 1 when there are no results)
    pub fn go_to(&mut self, page_number: usize, count: usize) {
        let last = self.total_pages(count).max(1);
        self.current_page = page_number.clamp(1, last);
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
