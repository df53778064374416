//! Character definitions for the scene.

mod character;
mod components;

pub use character::*;
pub use components::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Read a `null` field as the type's default, as hand-authored data often
/// spells "nothing" that way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One line of dialogue spoken by a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub timestamp: DateTime<Utc>,
    pub line: String,
}

impl DialogueEntry {
    /// Create an entry stamped at the given instant.
    pub fn new(timestamp: DateTime<Utc>, line: impl Into<String>) -> Self {
        Self {
            timestamp,
            line: line.into(),
        }
    }
}

impl std::fmt::Display for DialogueEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%Y-%m-%d %H:%M"), self.line)
    }
}
