//! Page-number pagination.
//!
//! Lenient like a classic web paginator: a missing or non-numeric page number
//! means the first page, and a number outside `1..=num_pages` means the last
//! page. An empty listing still has one (empty) page.

use serde::Serialize;

/// A requested page, before the total item count is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    requested: Option<i64>,
    per_page: u64,
}

impl PageRequest {
    /// Build a request from the raw `page` query parameter.
    pub fn parse(raw: Option<&str>, per_page: u64) -> Self {
        Self {
            requested: raw.and_then(|s| s.trim().parse().ok()),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u64) -> Self {
        Self::parse(None, per_page)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page).max(1)
    }

    /// The 1-based page number actually served for `total` items.
    pub fn resolve(&self, total: u64) -> u64 {
        let num_pages = self.num_pages(total);
        match self.requested {
            None => 1,
            Some(n) if n < 1 => num_pages,
            Some(n) => (n as u64).min(num_pages),
        }
    }

    /// Number of items to skip for the resolved page.
    pub fn offset(&self, total: u64) -> u64 {
        (self.resolve(total) - 1) * self.per_page
    }

    /// Wrap already-sliced `items` into a [`Page`].
    pub fn page<T>(&self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            items,
            number: self.resolve(total),
            num_pages: self.num_pages(total),
            total,
            per_page: self.per_page,
        }
    }

    /// Slice a fully materialised listing.
    pub fn paginate<T>(&self, all: Vec<T>) -> Page<T> {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(self.offset(total) as usize)
            .take(self.per_page as usize)
            .collect();
        self.page(items, total)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_page_of_fifteen() {
        let page = PageRequest::parse(Some("2"), 10).paginate((1..=15).collect::<Vec<_>>());
        assert_eq!(page.items, vec![11, 12, 13, 14, 15]);
        assert_eq!(page.number, 2);
        assert_eq!(page.num_pages, 2);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn garbage_page_means_first() {
        let req = PageRequest::parse(Some("abc"), 10);
        assert_eq!(req.resolve(35), 1);
        assert_eq!(PageRequest::parse(None, 10).resolve(35), 1);
    }

    #[test]
    fn out_of_range_means_last() {
        assert_eq!(PageRequest::parse(Some("99"), 10).resolve(35), 4);
        assert_eq!(PageRequest::parse(Some("0"), 10).resolve(35), 4);
        assert_eq!(PageRequest::parse(Some("-3"), 10).resolve(35), 4);
    }

    #[test]
    fn empty_listing_has_one_page() {
        let page = PageRequest::parse(Some("5"), 10).paginate(Vec::<u8>::new());
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let req = PageRequest::parse(Some("2"), 0);
        assert_eq!(req.per_page(), 1);
        assert_eq!(req.offset(3), 1);
    }
}
