//! Page requests and paginated envelopes.

use crate::error::InvalidInput;
use serde::{Deserialize, Serialize};

/// Page used when a caller does not pick one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when a caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Builds a page request.
    ///
    /// # Errors
    /// - `InvalidInput::PageRequest` when `page < 1` or `size < 1`. Values are
    ///   never clamped.
    pub fn new(page: u32, size: u32) -> Result<Self, InvalidInput> {
        if page < 1 || size < 1 {
            return Err(InvalidInput::PageRequest { page, size });
        }
        Ok(Self { page, size })
    }

    /// Zero-based row offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }

    /// `ceil(total / size)`; zero when nothing matched.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size))
    }
}

/// One raw page as returned by the store, with the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Externally visible page envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Converts a store slice into an envelope, mapping every item.
    pub fn from_slice<S>(slice: Slice<S>, request: &PageRequest, map: impl FnMut(S) -> T) -> Self {
        Self {
            total_pages: request.total_pages(slice.total),
            items: slice.items.into_iter().map(map).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PageRequest, Paginated, Slice};
    use crate::error::InvalidInput;

    #[test]
    fn zero_page_or_size_is_rejected() {
        assert_eq!(
            PageRequest::new(0, 10),
            Err(InvalidInput::PageRequest { page: 0, size: 10 })
        );
        assert_eq!(
            PageRequest::new(1, 0),
            Err(InvalidInput::PageRequest { page: 1, size: 0 })
        );
    }

    #[test]
    fn offset_is_zero_based() {
        let request = PageRequest::new(3, 20).unwrap();
        assert_eq!(request.offset(), 40);
        assert_eq!(request.limit(), 20);
        assert_eq!(PageRequest::new(1, 5).unwrap().offset(), 0);
    }

    #[test]
    fn offset_does_not_overflow_for_large_pages() {
        let request = PageRequest::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(
            request.offset(),
            u64::from(u32::MAX - 1) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn total_pages_rounds_up_and_is_zero_for_no_matches() {
        let request = PageRequest::new(1, 3).unwrap();
        assert_eq!(request.total_pages(0), 0);
        assert_eq!(request.total_pages(1), 1);
        assert_eq!(request.total_pages(3), 1);
        assert_eq!(request.total_pages(4), 2);
        assert_eq!(PageRequest::new(2, u32::MAX).unwrap().total_pages(5), 1);
    }

    #[test]
    fn envelope_serializes_with_camel_case_keys() {
        let request = PageRequest::new(1, 2).unwrap();
        let page = Paginated::from_slice(
            Slice {
                items: vec![1, 2],
                total: 5,
            },
            &request,
            |value: i32| value * 10,
        );
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_pages, 3);

        let json = serde_json::to_string(&page).unwrap();
        assert_eq!(json, r#"{"items":[10,20],"totalPages":3}"#);
    }
}
