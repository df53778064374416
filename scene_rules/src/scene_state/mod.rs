//! Scene state management - the mutable stage the characters talk on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Situational axes every fallback scene starts with.
pub const DEFAULT_STATE_AXES: [&str; 2] = ["TimeOfDay", "Weather"];

/// Kinds of free-text notes a scene accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteKind {
    Challenge,
    NotableLocation,
    BackgroundSound,
}

/// The complete state of the scene at any point in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    #[serde(default)]
    pub scene_name: String,

    #[serde(default)]
    pub description: String,

    /// Axis name -> current value, e.g. "TimeOfDay" -> "Sunset", in the
    /// order the axes were first set.
    #[serde(default)]
    states: IndexMap<String, String>,

    #[serde(default)]
    challenges: Vec<String>,

    #[serde(default)]
    notable_locations: Vec<String>,

    #[serde(default)]
    background_sounds: Vec<String>,

    #[serde(default)]
    is_complete: bool,
}

impl Default for SceneState {
    /// The fallback scene used when no scene source is available.
    fn default() -> Self {
        let mut scene = Self::new("Default Scene", "A generic scene unfolds...");
        for axis in DEFAULT_STATE_AXES {
            scene.set_state(axis, "Unknown");
        }
        scene
    }
}

impl SceneState {
    /// Create an empty, running scene.
    pub fn new(scene_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            scene_name: scene_name.into(),
            description: description.into(),
            states: IndexMap::new(),
            challenges: Vec::new(),
            notable_locations: Vec::new(),
            background_sounds: Vec::new(),
            is_complete: false,
        }
    }

    /// Set a situational axis, overwriting any previous value. An existing
    /// axis keeps its position.
    pub fn set_state(&mut self, axis: impl Into<String>, value: impl Into<String>) {
        self.states.insert(axis.into(), value.into());
    }

    pub fn state(&self, axis: &str) -> Option<&str> {
        self.states.get(axis).map(String::as_str)
    }

    pub fn states(&self) -> &IndexMap<String, String> {
        &self.states
    }

    /// Add a challenge or narrator directive.
    pub fn add_challenge(&mut self, text: impl Into<String>) {
        self.add_note(NoteKind::Challenge, text);
    }

    /// Append a note to the list for its kind. No deduplication.
    pub fn add_note(&mut self, kind: NoteKind, text: impl Into<String>) {
        let list = match kind {
            NoteKind::Challenge => &mut self.challenges,
            NoteKind::NotableLocation => &mut self.notable_locations,
            NoteKind::BackgroundSound => &mut self.background_sounds,
        };
        list.push(text.into());
    }

    pub fn notes(&self, kind: NoteKind) -> &[String] {
        match kind {
            NoteKind::Challenge => &self.challenges,
            NoteKind::NotableLocation => &self.notable_locations,
            NoteKind::BackgroundSound => &self.background_sounds,
        }
    }

    pub fn challenges(&self) -> &[String] {
        &self.challenges
    }

    pub fn notable_locations(&self) -> &[String] {
        &self.notable_locations
    }

    pub fn background_sounds(&self) -> &[String] {
        &self.background_sounds
    }

    /// Mark the scene complete. Completion is terminal.
    pub fn mark_complete(&mut self) {
        self.is_complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Render the scene for the operator, skipping empty sections.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("Scene: {}\n", self.scene_name));
        out.push_str(&self.description);
        out.push('\n');

        if !self.states.is_empty() {
            out.push_str("\nCurrent Scene States:\n");
            for (axis, value) in &self.states {
                out.push_str(&format!(" - {}: {}\n", axis, value));
            }
        }

        let sections = [
            ("Notable Locations", &self.notable_locations),
            ("Background Sounds", &self.background_sounds),
            ("Active Challenges", &self.challenges),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}:\n", title));
            for item in items {
                out.push_str(&format!(" - {}\n", item));
            }
        }

        out
    }
}

impl std::fmt::Display for SceneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}
