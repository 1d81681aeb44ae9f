//! crates/controlpet_core/src/paginate.rs
//!
//! Fixed-size pagination over an already-filtered collection. Out-of-range
//! page requests are clamped, never rejected.

/// One page of a roster, plus the figures the navigation UI needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    /// The page actually served, in `[1, total_pages]`.
    pub current: usize,
}

/// `max(1, ceil(count / page_size))`. An empty collection still has one
/// (empty) page so `current` always has a valid home.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    count.div_ceil(page_size).max(1)
}

/// Clamps any requested page number, including zero and negatives, into
/// `[1, total_pages]`.
pub fn clamp_page(requested: i64, total_pages: usize) -> usize {
    requested.clamp(1, total_pages as i64) as usize
}

pub fn paginate<T: Clone>(items: &[T], page_size: usize, requested: i64) -> Page<T> {
    let page_size = page_size.max(1);
    let total = total_pages(items.len(), page_size);
    let current = clamp_page(requested, total);

    let start = (current - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let items = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        total_pages: total,
        current,
    }
}

/// Bounded sliding window of page numbers for the navigation bar: `width`
/// pages centered on `current` when possible, clamped at both ends of
/// `[1, total_pages]`.
pub fn page_window(current: usize, total_pages: usize, width: usize) -> Vec<usize> {
    let width = width.max(1);
    if total_pages <= width {
        return (1..=total_pages).collect();
    }

    let half = width / 2;
    let (start, end) = if current <= width.div_ceil(2) {
        (1, width)
    } else if current + half >= total_pages {
        (total_pages - width + 1, total_pages)
    } else {
        (current - half, current + half)
    };

    (start..=end).collect()
}
