//! Client-side pagination of an already-fetched list.

use serde::Serialize;

/// Splits a list into fixed-size pages, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
    total_items: usize,
}

/// One page of items plus its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// 1-based page number, after clamping.
    pub number: usize,
    /// Total page count (at least 1).
    pub total_pages: usize,
    /// Total item count across all pages.
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// Whether a previous page exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// The `current / total` indicator shown under a list.
    #[must_use]
    pub fn indicator(&self) -> String {
        format!("{} / {}", self.number, self.total_pages)
    }
}

impl Paginator {
    /// Paginate `total_items` items, `per_page` per page. A page size of
    /// zero is treated as one.
    #[must_use]
    pub fn new(per_page: usize, total_items: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            total_items,
        }
    }

    /// Number of pages; an empty list still has one (empty) page.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    /// Clamp a requested page number into `1..=total_pages`.
    #[must_use]
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages())
    }

    /// Index range of page `page` (clamped).
    #[must_use]
    pub fn range(&self, page: usize) -> std::ops::Range<usize> {
        let page = self.clamp(page);
        let start = ((page - 1) * self.per_page).min(self.total_items);
        let end = (start + self.per_page).min(self.total_items);
        start..end
    }

    /// Slice page `page` (clamped) out of `items`.
    ///
    /// `items` should have the length this paginator was built with; a
    /// shorter slice is cut at its end.
    #[must_use]
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> Page<'a, T> {
        let number = self.clamp(page);
        let range = self.range(number);
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        Page {
            items: &items[start..end],
            number,
            total_pages: self.total_pages(),
            total_items: self.total_items,
        }
    }
}

/// Paginate `items` with `per_page` and return page `page`.
#[must_use]
pub fn paginate<T>(items: &[T], per_page: usize, page: usize) -> Page<'_, T> {
    Paginator::new(per_page, items.len()).page(items, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(Paginator::new(15, 0).total_pages(), 1);
        assert_eq!(Paginator::new(15, 1).total_pages(), 1);
        assert_eq!(Paginator::new(15, 15).total_pages(), 1);
        assert_eq!(Paginator::new(15, 16).total_pages(), 2);
        assert_eq!(Paginator::new(15, 100).total_pages(), 7);
    }

    #[test]
    fn test_every_page_full_except_last() {
        for len in [1_usize, 14, 15, 16, 30, 44, 100] {
            let items: Vec<usize> = (0..len).collect();
            let paginator = Paginator::new(15, len);
            let total = paginator.total_pages();

            let mut seen = Vec::new();
            for n in 1..=total {
                let page = paginator.page(&items, n);
                if n < total {
                    assert_eq!(page.items.len(), 15, "len {len} page {n}");
                } else {
                    assert!((1..=15).contains(&page.items.len()), "len {len} last page");
                }
                seen.extend_from_slice(page.items);
            }
            assert_eq!(seen, items);
        }
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let items: Vec<u8> = (0..40).collect();
        let last = paginate(&items, 15, 99);
        assert_eq!(last.number, 3);
        assert_eq!(last.items, &items[30..40]);
        assert!(!last.has_next());
        assert!(last.has_prev());

        let first = paginate(&items, 15, 0);
        assert_eq!(first.number, 1);
        assert!(!first.has_prev());
        assert_eq!(first.indicator(), "1 / 3");
    }

    #[test]
    fn test_empty_list_has_one_empty_page() {
        let items: Vec<u8> = Vec::new();
        let page = paginate(&items, 15, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_zero_page_size_is_one() {
        let items = [1, 2, 3];
        assert_eq!(paginate(&items, 0, 2).items, &[2]);
    }
}
