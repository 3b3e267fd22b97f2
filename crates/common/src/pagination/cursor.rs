//! Opaque pagination cursor
//!
//! A cursor is the position of the last article a client has seen: its
//! creation timestamp at millisecond precision and, optionally, its id to
//! break ties between articles created within the same millisecond.
//!
//! Wire form: `base64url(<timestamp>[|<id>])` where `<timestamp>` follows
//! [`CURSOR_TIME_FORMAT`], e.g. `2026-10-18T09:30:15.250+00:00|42`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timestamp type carried by cursors and stored on rows
pub type Timestamp = DateTime<FixedOffset>;

/// Reduced-precision ISO-8601 profile: millisecond fraction and explicit offset
pub const CURSOR_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Separates the timestamp from the tie-break id inside the payload
const ID_SEPARATOR: char = '|';

/// 0001-01-01T00:00:00Z, the position before every article
const ORIGIN_UNIX_SECONDS: i64 = -62_135_596_800;

/// Cursor decoding failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("malformed transport encoding: {0}")]
    InvalidEncoding(String),

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("payload does not match the cursor time format: {0}")]
    InvalidFormat(String),

    #[error("tie-break id is not an integer: {0}")]
    InvalidId(String),
}

/// The minimum timestamp, meaning "start from the beginning".
pub fn origin() -> Timestamp {
    DateTime::<Utc>::from_timestamp(ORIGIN_UNIX_SECONDS, 0)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .fixed_offset()
}

/// Normalise to UTC at millisecond precision, the only precision a cursor
/// can represent.
pub fn to_cursor_precision(timestamp: Timestamp) -> Timestamp {
    timestamp.with_timezone(&Utc).trunc_subsecs(3).fixed_offset()
}

/// Format a timestamp in the cursor time format (UTC normalised).
pub fn format_timestamp(timestamp: Timestamp) -> String {
    to_cursor_precision(timestamp)
        .format(CURSOR_TIME_FORMAT)
        .to_string()
}

/// Parse text in the cursor time format.
pub fn parse_timestamp(text: &str) -> Result<Timestamp, CursorError> {
    DateTime::parse_from_str(text, CURSOR_TIME_FORMAT)
        .map(to_cursor_precision)
        .map_err(|e| CursorError::InvalidFormat(format!("{:?}: {}", text, e)))
}

/// Encode a bare timestamp as cursor text. Never fails.
pub fn encode_timestamp(timestamp: Timestamp) -> String {
    URL_SAFE_NO_PAD.encode(format_timestamp(timestamp))
}

/// Decode cursor text to its timestamp. Empty text yields [`origin`].
pub fn decode_timestamp(text: &str) -> Result<Timestamp, CursorError> {
    Cursor::decode(text).map(|cursor| cursor.created_at)
}

/// A position in the (created_at, id) ordering of articles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: Timestamp,
    pub id: Option<i64>,
}

impl Cursor {
    /// Position before the first article
    pub fn start() -> Self {
        Self {
            created_at: origin(),
            id: None,
        }
    }

    /// Position of a specific row
    pub fn at(created_at: Timestamp, id: i64) -> Self {
        Self {
            created_at: to_cursor_precision(created_at),
            id: Some(id),
        }
    }

    /// Timestamp-only position; every row created in that millisecond is
    /// considered seen.
    pub fn from_timestamp(created_at: Timestamp) -> Self {
        Self {
            created_at: to_cursor_precision(created_at),
            id: None,
        }
    }

    pub fn is_start(&self) -> bool {
        self.id.is_none() && self.created_at == origin()
    }

    /// Opaque text form handed to clients
    pub fn encode(&self) -> String {
        let mut payload = format_timestamp(self.created_at);
        if let Some(id) = self.id {
            payload.push(ID_SEPARATOR);
            payload.push_str(&id.to_string());
        }
        URL_SAFE_NO_PAD.encode(payload)
    }

    /// Parse client-supplied cursor text. Empty text is the start position;
    /// trailing base64 padding is tolerated.
    pub fn decode(text: &str) -> Result<Self, CursorError> {
        if text.is_empty() {
            return Ok(Self::start());
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(text.trim_end_matches('='))
            .map_err(|e| CursorError::InvalidEncoding(e.to_string()))?;
        let payload = String::from_utf8(bytes).map_err(|_| CursorError::InvalidUtf8)?;

        match payload.split_once(ID_SEPARATOR) {
            Some((timestamp, id)) => {
                let id = id
                    .parse::<i64>()
                    .map_err(|_| CursorError::InvalidId(id.to_string()))?;
                Ok(Self {
                    created_at: parse_timestamp(timestamp)?,
                    id: Some(id),
                })
            }
            None => Ok(Self {
                created_at: parse_timestamp(&payload)?,
                id: None,
            }),
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Cursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
