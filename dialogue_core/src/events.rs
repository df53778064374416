//! Session events reported back to the operator.

use serde::{Deserialize, Serialize};

/// Something that happened during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The scene as it stands before a turn, rendered for the operator.
    SceneShown(String),

    /// A character produced a new line this turn.
    LineSpoken { speaker: String, line: String },

    /// The narrator added a directive to the scene.
    DirectiveAdded(String),

    /// A challenge was generated and added to the scene.
    ChallengeGenerated(String),

    /// The narrator let the scene run on.
    Continued,

    /// The narrator's selection was not understood. Not fatal.
    InvalidCommand(String),

    /// The scene was marked complete.
    SceneEnded,
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::SceneShown(summary) => f.write_str(summary),
            SessionEvent::LineSpoken { speaker, line } => write!(f, "{}: {}", speaker, line),
            SessionEvent::DirectiveAdded(text) => write!(f, "Directive added: {}", text),
            SessionEvent::ChallengeGenerated(text) => write!(f, "Generated challenge: {}", text),
            SessionEvent::Continued => f.write_str("The scene progresses..."),
            SessionEvent::InvalidCommand(_) => f.write_str("Invalid choice. Continuing the scene."),
            SessionEvent::SceneEnded => f.write_str("Ending the scene."),
        }
    }
}
