//! Cursor-based pagination
//!
//! - [`cursor`]: opaque cursor codec
//! - [`page`]: page requests and continuation

pub mod cursor;
pub mod page;

pub use cursor::{decode_timestamp, encode_timestamp, Cursor, CursorError, Timestamp};
pub use page::{Page, PageRequest, Positioned, DEFAULT_PAGE_SIZE};
