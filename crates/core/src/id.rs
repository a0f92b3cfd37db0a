//! Todo identifier scheme.
//!
//! A [`TodoId`] is 12 bytes laid out the same way as a MongoDB ObjectId:
//!
//! ```text
//! | 4 bytes            | 5 bytes               | 3 bytes          |
//! | unix seconds (BE)  | process-unique random | counter (BE)     |
//! ```
//!
//! Generation needs no coordination: the random middle section separates
//! processes, and the counter separates ids minted within the same second.
//! The external form is 24 lowercase hex characters.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Timestamp;

/// Number of raw bytes in an identifier.
pub const ID_LEN: usize = 12;

/// Number of hex characters in the string form.
pub const ID_HEX_LEN: usize = ID_LEN * 2;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(|| rand::rng().random());

static COUNTER: LazyLock<AtomicU32> =
    LazyLock::new(|| AtomicU32::new(rand::rng().random::<u32>() & COUNTER_MASK));

/// Errors produced when parsing a [`TodoId`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTodoIdError {
    #[error("expected {ID_HEX_LEN} hex characters, got {len} bytes")]
    InvalidLength { len: usize },

    #[error("invalid hex character at position {index}")]
    InvalidCharacter { index: usize },

    #[error("identifier is not valid UTF-8 text")]
    InvalidEncoding,
}

/// Opaque unique identifier of a todo item.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId([u8; ID_LEN]);

impl TodoId {
    /// Mint a new identifier, distinct from every identifier generated before it.
    pub fn generate() -> Self {
        let secs = chrono::Utc::now().timestamp().clamp(0, i64::from(u32::MAX)) as u32;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse the 24-character hex form. Upper-case digits are accepted.
    pub fn parse(s: &str) -> Result<Self, ParseTodoIdError> {
        let raw = s.as_bytes();
        if raw.len() != ID_HEX_LEN {
            return Err(ParseTodoIdError::InvalidLength { len: raw.len() });
        }

        let mut bytes = [0u8; ID_LEN];
        for (i, pair) in raw.chunks_exact(2).enumerate() {
            let hi = hex_value(pair[0]).ok_or(ParseTodoIdError::InvalidCharacter { index: i * 2 })?;
            let lo =
                hex_value(pair[1]).ok_or(ParseTodoIdError::InvalidCharacter { index: i * 2 + 1 })?;
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }

    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; ID_LEN] {
        self.0
    }

    /// The second at which this identifier was generated.
    pub fn timestamp(&self) -> Timestamp {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Timestamp::from_timestamp(i64::from(secs), 0).unwrap_or_default()
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TodoId({self})")
    }
}

impl FromStr for TodoId {
    type Err = ParseTodoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let ids: HashSet<TodoId> = (0..10_000).map(|_| TodoId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn display_is_lowercase_hex() {
        let s = TodoId::generate().to_string();
        assert_eq!(s.len(), ID_HEX_LEN);
        assert!(s
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn parse_recovers_generated_id() {
        let id = TodoId::generate();
        assert_eq!(TodoId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_accepts_uppercase() {
        let lower = TodoId::parse("65f1a2b3c4d5e6f708192a3b").unwrap();
        let upper = TodoId::parse("65F1A2B3C4D5E6F708192A3B").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.to_string(), "65f1a2b3c4d5e6f708192a3b");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_matches!(
            TodoId::parse("not-an-id"),
            Err(ParseTodoIdError::InvalidLength { len: 9 })
        );
        assert_matches!(
            TodoId::parse(""),
            Err(ParseTodoIdError::InvalidLength { len: 0 })
        );
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert_matches!(
            TodoId::parse("65f1a2b3c4d5e6f708192a3g"),
            Err(ParseTodoIdError::InvalidCharacter { index: 23 })
        );
    }

    #[test]
    fn parse_rejects_multibyte_input() {
        // 22 ASCII bytes plus one two-byte character is 24 bytes long.
        assert_matches!(
            TodoId::parse("65f1a2b3c4d5e6f708192aé"),
            Err(ParseTodoIdError::InvalidCharacter { index: 22 })
        );
    }

    #[test]
    fn timestamp_is_generation_second() {
        let before = chrono::Utc::now().timestamp();
        let id = TodoId::generate();
        let after = chrono::Utc::now().timestamp();

        let ts = id.timestamp().timestamp();
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn counter_increments_within_process() {
        let a = TodoId::generate().bytes();
        let b = TodoId::generate().bytes();
        assert_eq!(a[4..9], b[4..9]);
        assert_ne!(a[9..], b[9..]);
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = TodoId::parse("65f1a2b3c4d5e6f708192a3b").unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("65f1a2b3c4d5e6f708192a3b"));

        let back: TodoId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<TodoId>("\"xyz\"").is_err());
    }
}
