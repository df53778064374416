//! Character profile and its dialogue log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{null_as_default, DialogueEntry, Traits};

/// A persistent character taking part in the scene.
///
/// The profile fields are loaded once and never changed by the engine. The
/// dialogue log only grows, through [`Character::append`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub backstory: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub traits: Traits,

    #[serde(default, deserialize_with = "null_as_default")]
    pub equipment: Vec<String>,

    // Lives in its own history file, not in the profile.
    #[serde(skip)]
    dialogue_history: Vec<DialogueEntry>,
}

impl Character {
    /// Create a new character with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backstory: String::new(),
            description: String::new(),
            traits: Traits::new(),
            equipment: Vec::new(),
            dialogue_history: Vec::new(),
        }
    }

    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_traits(mut self, traits: Traits) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_equipment(mut self, equipment: Vec<String>) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full dialogue log in chronological order.
    pub fn dialogue_history(&self) -> &[DialogueEntry] {
        &self.dialogue_history
    }

    /// Append a line stamped with the current UTC time.
    pub fn append(&mut self, line: impl Into<String>) -> &DialogueEntry {
        self.append_at(line, Utc::now())
    }

    /// Append a line stamped at `at`.
    ///
    /// The stamp is raised to the previous entry's timestamp if it would go
    /// backwards, so the log stays non-decreasing.
    pub fn append_at(&mut self, line: impl Into<String>, at: DateTime<Utc>) -> &DialogueEntry {
        let timestamp = match self.dialogue_history.last() {
            Some(last) if last.timestamp > at => last.timestamp,
            _ => at,
        };
        self.dialogue_history.push(DialogueEntry::new(timestamp, line));
        &self.dialogue_history[self.dialogue_history.len() - 1]
    }

    /// Replace the log with one read from storage.
    pub(crate) fn replace_history(&mut self, history: Vec<DialogueEntry>) {
        self.dialogue_history = history;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_character() {
        let character = Character::new("Kai");
        assert_eq!(character.name(), "Kai");
        assert!(character.dialogue_history().is_empty());
        assert!(character.equipment.is_empty());
    }

    #[test]
    fn test_append_keeps_order() {
        let mut character = Character::new("Elena");
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 18, 5, 0).unwrap();

        character.append_at("First", t0);
        character.append_at("Second", t1);

        let lines: Vec<_> = character
            .dialogue_history()
            .iter()
            .map(|e| e.line.as_str())
            .collect();
        assert_eq!(lines, vec!["First", "Second"]);
    }

    #[test]
    fn test_append_clamps_backwards_timestamp() {
        let mut character = Character::new("Elena");
        let later = Utc.with_ymd_and_hms(2024, 5, 1, 18, 5, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 17, 0, 0).unwrap();

        character.append_at("Now", later);
        let entry = character.append_at("Before?", earlier);

        assert_eq!(entry.timestamp, later);
    }
}
