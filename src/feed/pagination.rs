// SPDX-License-Identifier: MPL-2.0

use crate::network::Page;

/// How far into the active filter's posts the feed has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    offset: u32,
    page_size: u32,
}

impl PaginationCursor {
    pub fn new(page_size: u32) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The window the next request should ask for.
    pub fn page(&self) -> Page {
        Page {
            offset: self.offset,
            size: self.page_size,
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Move past `received` posts that a successful fetch returned. A short
    /// final page advances by what actually arrived, not by the page size.
    pub fn advance(&mut self, received: usize) {
        let received = u32::try_from(received).unwrap_or(u32::MAX);
        self.offset = self.offset.saturating_add(received);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let cursor = PaginationCursor::new(5);
        assert_eq!(cursor.page(), Page { offset: 0, size: 5 });
    }

    #[test]
    fn test_advance_by_received_count() {
        let mut cursor = PaginationCursor::new(5);
        cursor.advance(5);
        cursor.advance(2);
        assert_eq!(cursor.offset(), 7);
        assert_eq!(cursor.page_size(), 5);
    }

    #[test]
    fn test_empty_page_does_not_move() {
        let mut cursor = PaginationCursor::new(5);
        cursor.advance(5);
        cursor.advance(0);
        assert_eq!(cursor.offset(), 5);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut cursor = PaginationCursor::new(10);
        cursor.advance(30);
        cursor.reset();
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.page_size(), 10);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        assert_eq!(PaginationCursor::new(0).page_size(), 1);
    }
}
