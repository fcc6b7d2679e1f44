//! Client-side pagination over an already fetched list

/// Cards per directory page
pub const PAGE_SIZE: usize = 6;

/// Fetched items plus the page being shown (1-based)
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator<T> {
    items: Vec<T>,
    page: usize,
    page_size: usize,
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl<T> Paginator<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Swap in a freshly loaded list; always lands on page 1
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = 1;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(len / page_size)`; an empty list has no pages
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// Move to `page`, clamped into range. Returns the page actually shown.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.page_count().max(1));
        self.page
    }

    pub fn next(&mut self) -> usize {
        self.go_to(self.page + 1)
    }

    pub fn prev(&mut self) -> usize {
        self.go_to(self.page.saturating_sub(1))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Items on the current page
    pub fn current(&self) -> &[T] {
        let start = (self.page - 1) * self.page_size;
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }
}
