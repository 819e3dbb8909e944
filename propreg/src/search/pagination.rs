use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Zero-based page cursor over an in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// A pager at page 0. A zero page size is raised to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    #[inline]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    #[inline]
    pub fn page(&self) -> usize {
        self.page
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    /// `[page*size, page*size+size)`, clamped to the list.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    #[inline]
    pub fn has_more(&self, len: usize) -> bool {
        self.page.saturating_add(1).saturating_mul(self.page_size) < len
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Advances one page unless the current one is the last. Returns whether it moved.
    pub fn next(&mut self, len: usize) -> bool {
        if self.has_more(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Steps back one page unless already at page 0. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// Number of pages needed for `len` items; an empty list still has one page.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    pub fn paginate<'a, T>(&self, items: &'a [T]) -> Page<&'a T> {
        Page {
            items: self.slice(items).iter().collect(),
            total: items.len(),
            page: self.page,
            page_size: self.page_size,
            has_more: self.has_more(items.len()),
            has_previous: self.has_previous(),
        }
    }
}

/// One page of results with the numbers needed to render pager controls.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1)).max(1)
    }
}
