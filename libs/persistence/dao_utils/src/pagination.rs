pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// Normalized page request: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn page(&self) -> u64 { self.page }

    pub fn limit(&self) -> u64 { self.limit }

    pub fn offset(&self) -> u64 { (self.page - 1).saturating_mul(self.limit) }

    /// Cut this page out of an already filtered and ordered result set.
    pub fn slice<T>(&self, items: Vec<T>) -> Paged<T> {
        let total = items.len() as u64;
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(offset).take(limit).collect();
        Paged { items, total }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self::new(None, None) }
}

/// One page of rows plus the size of the full filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Pagination::default();
        assert_eq!((page.page(), page.limit(), page.offset()), (1, 20, 0));
    }

    #[test]
    fn test_clamping() {
        assert_eq!(Pagination::new(Some(0), Some(0)).page(), 1);
        assert_eq!(Pagination::new(Some(0), Some(0)).limit(), 1);
        assert_eq!(Pagination::new(None, Some(500)).limit(), MAX_LIMIT);
        assert_eq!(Pagination::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_slice_keeps_total() {
        let page = Pagination::new(Some(2), Some(2)).slice(vec![1, 2, 3, 4, 5]);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);

        let beyond = Pagination::new(Some(9), Some(2)).slice(vec![1, 2, 3]);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 3);
    }
}
