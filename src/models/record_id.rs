//! Record identifiers.
//!
//! Records written by this server are keyed by a generated 12-byte [`ObjectId`].
//! Records imported from the older catalog keep their integer key. Both live
//! side by side in the same collection, so every lookup goes through the
//! tagged [`RecordId`].

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::error::{AppError, AppResult};

/// Store-generated identifier: 4-byte timestamp, 5 process-unique bytes,
/// 3-byte counter. Rendered as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr)]
pub struct ObjectId([u8; 12]);

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

impl ObjectId {
    pub const LEN: usize = 12;

    /// Generate a fresh id
    pub fn new() -> Self {
        let timestamp = Utc::now().timestamp() as u32;
        let process = PROCESS_UNIQUE.get_or_init(rand::random);
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>() & 0x00ff_ffff))
            .fetch_add(1, Ordering::Relaxed)
            & 0x00ff_ffff;

        let mut bytes = [0u8; Self::LEN];
        bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(process);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Seconds since the epoch at which the id was generated
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// True when `s` is exactly 24 hex characters
    pub fn is_valid(s: &str) -> bool {
        s.len() == Self::LEN * 2 && s.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(AppError::BadRequest(format!("Invalid object id: {}", s)));
        }
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| AppError::BadRequest(format!("Invalid object id {}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

/// Identifier of a catalog record.
///
/// In JSON a generated id is a hex string and a legacy id a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Generated(ObjectId),
    Legacy(i64),
}

impl RecordId {
    /// Resolve an identifier coming from a URL or a form.
    ///
    /// Surrounding whitespace is ignored. A 24-hex string is a generated id;
    /// anything else must parse as an integer. Legacy ids are `i64`, which
    /// never have 24 digits, so the two cases cannot overlap.
    pub fn resolve(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if ObjectId::is_valid(trimmed) {
            return Ok(RecordId::Generated(trimmed.parse()?));
        }
        trimmed
            .parse::<i64>()
            .map(RecordId::Legacy)
            .map_err(|_| AppError::BadRequest(format!("Invalid record id: {}", raw)))
    }

    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            RecordId::Generated(oid) => Some(oid),
            RecordId::Legacy(_) => None,
        }
    }

    pub fn as_legacy(&self) -> Option<i64> {
        match self {
            RecordId::Generated(_) => None,
            RecordId::Legacy(id) => Some(*id),
        }
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        RecordId::Generated(oid)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Legacy(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Generated(oid) => write!(f, "{}", oid),
            RecordId::Legacy(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for RecordId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}
