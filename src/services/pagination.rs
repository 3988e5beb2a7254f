//! Post listing pagination
//!
//! Pure page arithmetic over an ordered collection. Requests beyond the last
//! page are clamped to the last page so navigation links stay consistent.

use serde::Serialize;

/// Parse the raw `page` query value.
///
/// Only plain ASCII digit strings count as numeric; signs and whitespace
/// do not. Absent, empty, non-numeric and zero values all select page 1.
/// Numbers too large for `u32` saturate so that they clamp to the last page.
pub fn parse_page(raw: Option<&str>) -> u32 {
    match raw {
        Some(value) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
            // All digits, so overflow is the only possible parse error
            value.parse::<u32>().unwrap_or(u32::MAX).max(1)
        }
        _ => 1,
    }
}

/// The slice of a collection shown on one page, plus navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Selected page after clamping (1-based)
    pub page: u32,
    /// Number of the last page, at least 1
    pub last_page: u32,
    /// First index in the window
    pub start: usize,
    /// One past the last index in the window
    pub end: usize,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl PageWindow {
    /// Compute the window for `requested` over `count` items, `per_page` at a time.
    ///
    /// A `per_page` of zero is treated as one.
    pub fn compute(count: usize, per_page: usize, requested: u32) -> Self {
        let per_page = per_page.max(1);
        let last_page = count.div_ceil(per_page).max(1);
        let last_page = u32::try_from(last_page).unwrap_or(u32::MAX);
        let page = requested.clamp(1, last_page);

        let start = ((page - 1) as usize).saturating_mul(per_page).min(count);
        let end = start.saturating_add(per_page).min(count);

        Self {
            page,
            last_page,
            start,
            end,
            prev: (page > 1).then(|| page - 1),
            next: (page < last_page).then(|| page + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A page of items ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub last_page: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

/// Cut one page out of `items`.
pub fn paginate<T: Clone>(items: &[T], per_page: usize, requested: u32) -> Paged<T> {
    let window = PageWindow::compute(items.len(), per_page, requested);
    Paged {
        items: items[window.start..window.end].to_vec(),
        page: window.page,
        last_page: window.last_page,
        prev: window.prev,
        next: window.next,
    }
}
