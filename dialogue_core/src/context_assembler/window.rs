//! Bounded window over a character's dialogue log.

use scene_rules::DialogueEntry;

/// Rendered in place of an empty window.
pub const NO_RECENT_DIALOGUE: &str = "No recent dialogue available.";

/// The most recent slice of a dialogue log, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct DialogueWindow<'a> {
    entries: &'a [DialogueEntry],
}

impl<'a> DialogueWindow<'a> {
    /// Take the last `size` entries of `history`.
    pub fn recent(history: &'a [DialogueEntry], size: usize) -> Self {
        let start = history.len().saturating_sub(size);
        Self {
            entries: &history[start..],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a DialogueEntry> {
        let entries: &'a [DialogueEntry] = self.entries;
        entries.iter()
    }

    /// One line per entry with a minute-resolution stamp, or the placeholder.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return NO_RECENT_DIALOGUE.to_string();
        }

        self.entries
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
