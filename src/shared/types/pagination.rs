/// Largest row offset a request may produce; SQL offsets are signed 64-bit.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Pagination request (1-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        let size = size.max(1);
        Self {
            page: page.clamp(1, MAX_OFFSET / size + 1),
            size,
        }
    }

    /// Build a request from optional query values, falling back to
    /// `default_size` and capping the size at `max_size`.
    pub fn clamped(page: Option<u64>, size: Option<u64>, default_size: u64, max_size: u64) -> Self {
        let size = size.unwrap_or(default_size).clamp(1, max_size.max(1));
        Self::new(page.unwrap_or(1), size)
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

/// Paginated result wrapper
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            items,
            page: request.page,
            size: request.size,
            total_pages: total_elements.div_ceil(request.size),
            total_elements,
        }
    }

    /// Slice an already filtered and ordered collection into one page.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.size as usize)
            .collect();
        Self::new(items, request, total)
    }
}
