//! Server-assigned record identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the backend to every persisted record.
///
/// Ids are opaque to the client: they are compared, displayed and sent back
/// in URLs, never computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Creates a record id from its raw value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ovolab_core::RecordId;
    ///
    /// let id = RecordId::new(7);
    /// assert_eq!(id.get(), 7);
    /// assert_eq!(id.to_string(), "7");
    /// ```
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
