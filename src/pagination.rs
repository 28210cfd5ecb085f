//! Cursor pagination over an ordered collection.
//!
//! A [`CursorPager`] never computes offsets or totals. It remembers the
//! cursors of the rows bounding the current page plus a stack with the first
//! cursor of every page visited before it, and turns a navigation request
//! into the [`PagePosition`] the next range read must start from.

use serde::{Deserialize, Serialize};

/// Rows shown per page of the customer list.
pub const PAGE_SIZE: usize = 10;

/// Navigation request issued by the list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Start,
    Next,
    Prev,
}

/// Where a range read begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PagePosition<C> {
    /// From the first row of the ordering.
    Start,
    /// Strictly after the given row.
    After(C),
    /// At the given row, inclusive.
    AtOrAfter(C),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorPager<C> {
    page_size: usize,
    first: Option<C>,
    last: Option<C>,
    history: Vec<C>,
    page: usize,
    last_len: usize,
}

impl<C: Clone> CursorPager<C> {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            first: None,
            last: None,
            history: Vec::new(),
            page: 1,
            last_len: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-based number of the page on screen.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Start position for `direction`, or `None` when the move is impossible.
    ///
    /// `Next` requires the last cursor of the current page. `Prev` requires a
    /// stored boundary and re-reads the previous page from its first row.
    pub fn position(&self, direction: Direction) -> Option<PagePosition<C>> {
        match direction {
            Direction::Start => Some(PagePosition::Start),
            Direction::Next => self.last.clone().map(PagePosition::After),
            Direction::Prev => self.history.last().cloned().map(PagePosition::AtOrAfter),
        }
    }

    /// Records the outcome of a read issued for `direction`.
    pub fn record(&mut self, direction: Direction, first: Option<C>, last: Option<C>, len: usize) {
        match direction {
            Direction::Start => {
                self.history.clear();
                self.page = 1;
            }
            Direction::Next => {
                if let Some(previous_first) = self.first.take() {
                    self.history.push(previous_first);
                }
                self.page += 1;
            }
            Direction::Prev => {
                self.history.pop();
                self.page = self.page.saturating_sub(1).max(1);
            }
        }
        self.first = first;
        self.last = last;
        self.last_len = len;
    }

    /// A full page suggests more rows may follow. A collection whose size is a
    /// multiple of the page size therefore offers one extra, empty page.
    pub fn has_next(&self) -> bool {
        self.last_len == self.page_size && self.last.is_some()
    }

    pub fn has_prev(&self) -> bool {
        !self.history.is_empty()
    }
}
