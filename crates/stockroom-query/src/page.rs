//! Page requests and paginated results.

use serde::Serialize;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number. Values outside the available range are clamped.
    pub number: usize,
    /// Records per page. Must be greater than zero.
    pub size: usize,
}

impl PageRequest {
    /// Creates a page request.
    pub fn new(number: usize, size: usize) -> Self {
        PageRequest { number, size }
    }

    /// Number of pages needed for `total` records, never less than one.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.size).max(1)
    }

    /// The requested page number clamped into `[1, total_pages]`.
    pub fn clamped(&self, total_pages: usize) -> usize {
        self.number.clamp(1, total_pages)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of query results.
///
/// Items borrow from the collection the query ran against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<'a, T> {
    /// Records on this page, in result order.
    pub items: Vec<&'a T>,
    /// Records matching the filters, before pagination.
    pub total_matching: usize,
    /// Pages available at this page size, at least one.
    pub total_pages: usize,
    /// Effective page number after clamping.
    pub page: usize,
    /// Records per page.
    pub page_size: usize,
}

impl<'a, T> ListPage<'a, T> {
    /// Returns `true` if the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 1-based position of the first record on this page within the full
    /// result, or 0 when the page is empty.
    pub fn first_position(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// Clones the page's records into an owned vector.
    pub fn to_owned_items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().map(|item| (*item).clone()).collect()
    }
}

/// Cuts one page out of a filtered and sorted result.
pub(crate) fn paginate<'a, T>(matching: Vec<&'a T>, request: PageRequest) -> ListPage<'a, T> {
    let total_matching = matching.len();
    let total_pages = request.total_pages(total_matching);
    let page = request.clamped(total_pages);
    let start = (page - 1) * request.size;
    let items = matching.into_iter().skip(start).take(request.size).collect();

    ListPage {
        items,
        total_matching,
        total_pages,
        page,
        page_size: request.size,
    }
}
