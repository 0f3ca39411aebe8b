//! Page-number pagination primitives shared by vetdesk list endpoints.
//!
//! List endpoints accept a 1-based page number plus a page size and answer
//! with the requested slice and the total page count, so clients can render
//! classic pager controls without a second round trip. This crate owns the
//! request-side validation and the response envelope; storage adapters only
//! see the derived SQL `LIMIT`/`OFFSET` values.

use serde::Serialize;

/// Largest accepted page size.
///
/// Requests above this are rejected rather than clamped so that callers
/// learn about the limit instead of silently receiving truncated pages.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation errors returned by [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are 1-based; zero is not addressable.
    #[error("page number must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
    /// Page size exceeds [`MAX_PAGE_SIZE`].
    #[error("page size must be at most {MAX_PAGE_SIZE}")]
    PageSizeTooLarge,
}

/// Validated 1-based page request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 20)?;
/// assert_eq!(request.offset(), 40);
/// assert_eq!(request.limit(), 20);
/// # Ok::<(), pagination::PageRequestError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate a page number and page size pair.
    ///
    /// # Errors
    ///
    /// Returns a [`PageRequestError`] when the page is zero or the size is
    /// outside `1..=MAX_PAGE_SIZE`.
    pub const fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if page_size == 0 {
            return Err(PageRequestError::ZeroPageSize);
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeTooLarge);
        }
        Ok(Self { page, page_size })
    }

    /// The validated 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The validated page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip for this page, suitable for SQL `OFFSET`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Number of rows to fetch for this page, suitable for SQL `LIMIT`.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// One page of results plus the total page count for the collection.
///
/// Serialises with a camelCase `numberOfPages` field, matching the wire
/// contract of the list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    /// Items on the requested page, in storage order.
    pub items: Vec<T>,
    /// Total number of addressable pages; zero for an empty collection.
    pub number_of_pages: u64,
}

impl<T> PageEnvelope<T> {
    /// Assemble an envelope from one page of items and the collection total.
    ///
    /// `total_items` is the size of the whole collection, not of `items`;
    /// the page count is derived from it with the page size of `request`.
    #[must_use]
    pub fn new(items: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        Self {
            items,
            number_of_pages: total_items.div_ceil(u64::from(request.page_size())),
        }
    }
}
