//! Page planning for cursor-based list retrieval
//!
//! A [`PageRequest`] is the bounded fetch a list call turns into; a [`Page`]
//! is its result plus the continuation cursor. A full page is taken to mean
//! more rows may follow, so the next cursor is emitted whenever the page is
//! full, even if the following page turns out empty.

use super::cursor::{Cursor, CursorError};
use crate::config::PaginationConfig;

/// Page size used when the client asks for zero or omits `num`
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Items that occupy a position in the cursor ordering
pub trait Positioned {
    fn position(&self) -> Cursor;
}

/// One bounded, ordered fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of rows to return
    pub size: u64,

    /// Exclusive lower bound
    pub after: Cursor,
}

impl PageRequest {
    pub fn new(size: u64, after: Cursor) -> Self {
        Self { size, after }
    }

    /// Build a request from raw query input. A zero or missing size falls
    /// back to the configured default and oversize requests are clamped.
    /// An empty or missing cursor starts from the beginning.
    pub fn from_query(
        num: Option<u64>,
        cursor: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, CursorError> {
        let size = match num {
            None | Some(0) => config.default_page_size,
            Some(n) => n.min(config.max_page_size),
        };
        let after = Cursor::decode(cursor.unwrap_or_default())?;

        Ok(Self { size, after })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, Cursor::start())
    }
}

/// One page of results and the cursor for the next call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Empty when the end of the list has been reached
    pub next_cursor: String,
}

impl<T: Positioned> Page<T> {
    /// Wrap fetched rows, emitting a next cursor iff the page is full.
    pub fn from_fetch(items: Vec<T>, request: &PageRequest) -> Self {
        let next_cursor = match items.last() {
            Some(last) if items.len() as u64 == request.size => last.position().encode(),
            _ => String::new(),
        };

        Self { items, next_cursor }
    }
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        !self.next_cursor.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::cursor::Timestamp;
    use chrono::{Duration, TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: i64,
        created_at: Timestamp,
    }

    impl Positioned for Row {
        fn position(&self) -> Cursor {
            Cursor::at(self.created_at, self.id)
        }
    }

    fn rows(count: i64, same_millis_every: i64) -> Vec<Row> {
        let base = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap().fixed_offset();
        (1..=count)
            .map(|id| Row {
                id,
                // groups of `same_millis_every` rows share one millisecond
                created_at: base + Duration::milliseconds((id - 1) / same_millis_every),
            })
            .collect()
    }

    /// In-memory stand-in for the store: rows after the cursor in
    /// (created_at, id) order, at most `size` of them.
    fn fetch(store: &[Row], request: &PageRequest) -> Vec<Row> {
        let after = request.after;
        let mut matching: Vec<Row> = store
            .iter()
            .filter(|row| match after.id {
                Some(id) => {
                    row.created_at > after.created_at
                        || (row.created_at == after.created_at && row.id > id)
                }
                None => row.created_at > after.created_at,
            })
            .cloned()
            .collect();
        matching.sort_by_key(|row| (row.created_at, row.id));
        matching.truncate(request.size as usize);
        matching
    }

    fn traverse(store: &[Row], size: u64) -> (Vec<i64>, usize) {
        let mut seen = Vec::new();
        let mut calls = 0;
        let mut cursor = String::new();
        loop {
            let request = PageRequest::new(size, Cursor::decode(&cursor).unwrap());
            let page = Page::from_fetch(fetch(store, &request), &request);
            calls += 1;
            seen.extend(page.items.iter().map(|row| row.id));
            if !page.has_more() {
                return (seen, calls);
            }
            cursor = page.next_cursor;
        }
    }

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_zero_or_missing_size_uses_default() {
        let request = PageRequest::from_query(None, None, &config()).unwrap();
        assert_eq!(request.size, 10);
        assert!(request.after.is_start());

        let request = PageRequest::from_query(Some(0), Some(""), &config()).unwrap();
        assert_eq!(request.size, 10);
        assert!(request.after.is_start());
    }

    #[test]
    fn test_oversize_request_is_clamped() {
        let request = PageRequest::from_query(Some(5_000), None, &config()).unwrap();
        assert_eq!(request.size, 100);
    }

    #[test]
    fn test_malformed_cursor_is_rejected() {
        let result = PageRequest::from_query(Some(3), Some("%%%"), &config());
        assert!(matches!(result, Err(CursorError::InvalidEncoding(_))));
    }

    #[test]
    fn test_short_page_has_no_next_cursor() {
        let store = rows(3, 1);
        let request = PageRequest::new(5, Cursor::start());
        let page = Page::from_fetch(fetch(&store, &request), &request);
        assert_eq!(page.len(), 3);
        assert!(!page.has_more());
        assert_eq!(page.next_cursor, "");
    }

    #[test]
    fn test_empty_page_has_no_next_cursor() {
        let request = PageRequest::default();
        let page = Page::<Row>::from_fetch(Vec::new(), &request);
        assert!(page.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_full_page_at_exact_boundary_still_emits_cursor() {
        let store = rows(4, 1);
        let request = PageRequest::new(4, Cursor::start());
        let page = Page::from_fetch(fetch(&store, &request), &request);
        assert_eq!(page.len(), 4);
        assert!(page.has_more());
        assert_eq!(page.next_cursor, store[3].position().encode());

        // The follow-up page is empty and terminates the traversal
        let next = PageRequest::new(4, Cursor::decode(&page.next_cursor).unwrap());
        let page = Page::from_fetch(fetch(&store, &next), &next);
        assert!(page.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_traversal_visits_every_row_once_in_order() {
        for total in [0i64, 1, 2, 7, 10, 23] {
            for size in [1u64, 2, 3, 10] {
                let store = rows(total, 1);
                let (seen, calls) = traverse(&store, size);
                let expected: Vec<i64> = (1..=total).collect();
                assert_eq!(seen, expected, "total={} size={}", total, size);

                // Full pages emit a cursor, so an exact multiple costs one extra call
                let max_calls = (total as u64).div_ceil(size) as usize + 1;
                assert!(calls <= max_calls, "total={} size={} calls={}", total, size, calls);
            }
        }
    }

    #[test]
    fn test_same_millisecond_rows_are_not_skipped() {
        // Five rows per millisecond and a page size that splits every group
        let store = rows(20, 5);
        let (seen, _) = traverse(&store, 3);
        assert_eq!(seen, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_map_keeps_cursor() {
        let store = rows(2, 1);
        let request = PageRequest::new(2, Cursor::start());
        let page = Page::from_fetch(fetch(&store, &request), &request);
        let cursor = page.next_cursor.clone();
        let ids = page.map(|row| row.id);
        assert_eq!(ids.items, vec![1, 2]);
        assert_eq!(ids.next_cursor, cursor);
    }
}
