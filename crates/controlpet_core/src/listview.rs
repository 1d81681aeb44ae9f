//! crates/controlpet_core/src/listview.rs
//!
//! Per-screen list state: the raw collection, the active filter, and the
//! current page. Enforces the two roster invariants: the current page always
//! lies in `[1, total_pages]`, and any change to the filtered collection's
//! size sends the user back to page 1.

use crate::domain::{Entity, EntityId};
use crate::filter::{self, DateRange, Searchable};
use crate::paginate::{self, Page};

#[derive(Debug, Clone)]
pub struct ListView<T> {
    raw: Vec<T>,
    search_text: String,
    date_range: DateRange,
    current_page: usize,
    page_size: usize,
}

impl<T: Entity + Searchable> ListView<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            raw: Vec::new(),
            search_text: String::new(),
            date_range: DateRange::default(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Wholesale replacement after a (re)fetch. Always lands on page 1.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.raw = items;
        self.current_page = 1;
    }

    /// Identity-preserving splice: swaps the entity with the same id for the
    /// server's response verbatim. The raw count is unchanged, but an edit
    /// may move the entity in or out of the active filter, so the page
    /// resets whenever the filtered size moves.
    pub fn apply_update(&mut self, updated: T) {
        let before = self.filtered().len();
        if let Some(slot) = self.raw.iter_mut().find(|e| e.id() == updated.id()) {
            *slot = updated;
        }
        self.reset_if_resized(before);
    }

    /// Appends a freshly created entity (id already server-assigned).
    pub fn insert(&mut self, created: T) {
        let before = self.filtered().len();
        self.raw.push(created);
        self.reset_if_resized(before);
    }

    /// Removes by id. Called only after the remote delete succeeded.
    pub fn remove(&mut self, id: EntityId) {
        let before = self.filtered().len();
        self.raw.retain(|e| e.id() != id);
        self.reset_if_resized(before);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.current_page = 1;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        self.current_page = 1;
    }

    /// Out-of-range requests are clamped, never rejected.
    pub fn go_to_page(&mut self, requested: i64) {
        let total = paginate::total_pages(self.filtered().len(), self.page_size);
        self.current_page = paginate::clamp_page(requested, total);
    }

    pub fn filtered(&self) -> Vec<T> {
        filter::apply(&self.raw, &self.search_text, self.date_range)
    }

    pub fn page(&self) -> Page<T> {
        paginate::paginate(&self.filtered(), self.page_size, self.current_page as i64)
    }

    /// Sliding window of page numbers for the navigation bar.
    pub fn page_numbers(&self, width: usize) -> Vec<usize> {
        let page = self.page();
        paginate::page_window(page.current, page.total_pages, width)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.raw.iter().find(|e| e.id() == id)
    }

    fn reset_if_resized(&mut self, filtered_before: usize) {
        if self.filtered().len() != filtered_before {
            self.current_page = 1;
        }
    }
}
