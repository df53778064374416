//! Session - the turn-based loop driving a two-character scene.
//!
//! Each turn, both characters speak once (first, then second), each from a
//! context built out of the histories as they stood before the turn. After
//! the turn the operator picks one narrator command, which may mutate the
//! scene or end it.

mod command;

pub use command::*;

use chrono::{DateTime, Utc};
use scene_rules::{store, Character, SceneState, StoreError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{ConfigError, SessionConfig, DEFAULT_CHALLENGE_PROMPT};
use crate::context_assembler::{ContextAssembler, ContextError};
use crate::events::SessionEvent;
use crate::generator::{normalize_response, GeneratorError, TextGenerator};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Operator input error: {0}")]
    Operator(#[source] std::io::Error),

    #[error("the scene is already complete")]
    SceneComplete,
}

/// Unique identifier for a session, used to correlate log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session lifecycle. `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Running,
    Complete,
}

/// Source of dialogue timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A character in the session together with the file its log is saved to.
#[derive(Debug, Clone)]
pub struct Participant {
    pub character: Character,
    pub history_path: PathBuf,
}

impl Participant {
    pub fn new(character: Character, history_path: impl Into<PathBuf>) -> Self {
        Self {
            character,
            history_path: history_path.into(),
        }
    }

    /// Load the profile (required) and history (optional) from disk.
    pub fn load(profile: impl Into<PathBuf>, history: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let profile: PathBuf = profile.into();
        let history_path: PathBuf = history.into();
        let mut character = store::load_profile(&profile)?;
        store::load_history(&mut character, &history_path)?;
        Ok(Self::new(character, history_path))
    }
}

/// A running scene between two characters.
pub struct Session<G> {
    id: SessionId,
    participants: [Participant; 2],
    scene: SceneState,
    generator: G,
    assembler: ContextAssembler,
    clock: Box<dyn Clock>,
    challenge_prompt: String,
    turns: u32,
}

impl<G: TextGenerator> Session<G> {
    /// Create a session. `first` always speaks before `second`.
    pub fn new(first: Participant, second: Participant, scene: SceneState, generator: G) -> Self {
        Self {
            id: SessionId::new(),
            participants: [first, second],
            scene,
            generator,
            assembler: ContextAssembler::with_defaults(),
            clock: Box::new(SystemClock),
            challenge_prompt: DEFAULT_CHALLENGE_PROMPT.to_string(),
            turns: 0,
        }
    }

    /// Load characters and scene as described by `config`.
    ///
    /// A missing or malformed character source aborts; a missing or
    /// malformed scene falls back to [`SceneState::default`].
    pub fn from_config(config: &SessionConfig, generator: G) -> Result<Self, SessionError> {
        config.validate()?;

        let mut cast = config
            .characters
            .iter()
            .map(|source| Participant::load(&source.profile, &source.history))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        let (Some(first), Some(second)) = (cast.next(), cast.next()) else {
            return Err(ConfigError::Invalid("expected two characters".into()).into());
        };

        let scene = match &config.scene {
            Some(path) => store::load_scene(path, SceneState::default),
            None => SceneState::default(),
        };

        Ok(Self::new(first, second, scene, generator)
            .with_assembler(ContextAssembler::new(config.assembler.clone()))
            .with_challenge_prompt(config.challenge_prompt.clone()))
    }

    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_challenge_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.challenge_prompt = prompt.into();
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        if self.scene.is_complete() {
            SessionState::Complete
        } else {
            SessionState::Running
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn participants(&self) -> &[Participant; 2] {
        &self.participants
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Number of completed turns.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Run one turn: each character speaks once and its log is saved.
    ///
    /// Both prompts are built before the first generator call, so a
    /// missing trait fails the turn before anything is generated and each
    /// character sees the other's log as it was before this turn.
    pub async fn run_turn(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        let span = tracing::info_span!("turn", session = %self.id, turn = self.turns + 1);
        self.play_turn().instrument(span).await
    }

    async fn play_turn(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        if self.state() == SessionState::Complete {
            return Err(SessionError::SceneComplete);
        }

        let [first, second] = &self.participants;
        let prompts = [
            self.assembler
                .build_context(&first.character, &second.character, &self.scene)?,
            self.assembler
                .build_context(&second.character, &first.character, &self.scene)?,
        ];

        let turn = self.turns + 1;
        let mut events = Vec::with_capacity(prompts.len());

        for (participant, prompt) in self.participants.iter_mut().zip(prompts) {
            let raw = self.generator.generate(&prompt).await?;
            let line = normalize_response(&raw);

            participant.character.append_at(line.clone(), self.clock.now());
            store::save_history(&participant.character, &participant.history_path)?;

            tracing::debug!(speaker = participant.character.name(), "Line generated");
            events.push(SessionEvent::LineSpoken {
                speaker: participant.character.name().to_string(),
                line,
            });
        }

        self.turns = turn;
        Ok(events)
    }

    /// Apply one narrator command to a running session.
    pub async fn apply(&mut self, command: NarratorCommand) -> Result<SessionEvent, SessionError> {
        if self.state() == SessionState::Complete {
            return Err(SessionError::SceneComplete);
        }

        let event = match command {
            NarratorCommand::AddDirective(text) => {
                self.scene.add_challenge(text.clone());
                tracing::info!(session = %self.id, directive = %text, "Directive added");
                SessionEvent::DirectiveAdded(text)
            }
            NarratorCommand::GenerateChallenge => {
                let raw = self.generator.generate(&self.challenge_prompt).await?;
                let challenge = normalize_response(&raw);
                self.scene.add_challenge(challenge.clone());
                tracing::info!(session = %self.id, challenge = %challenge, "Challenge generated");
                SessionEvent::ChallengeGenerated(challenge)
            }
            NarratorCommand::Continue => SessionEvent::Continued,
            NarratorCommand::End => {
                self.scene.mark_complete();
                tracing::info!(session = %self.id, turns = self.turns, "Scene ended");
                SessionEvent::SceneEnded
            }
            NarratorCommand::Unrecognized(input) => {
                tracing::warn!(session = %self.id, input = %input, "Unrecognized narrator command");
                SessionEvent::InvalidCommand(input)
            }
        };

        Ok(event)
    }

    /// Drive the session until the scene is complete.
    ///
    /// Returns the number of turns played.
    pub async fn run<O: Operator + ?Sized>(&mut self, operator: &mut O) -> Result<u32, SessionError> {
        tracing::info!(
            session = %self.id,
            scene = %self.scene.scene_name,
            first = self.participants[0].character.name(),
            second = self.participants[1].character.name(),
            "Session started"
        );

        while self.state() == SessionState::Running {
            operator
                .notify(&SessionEvent::SceneShown(self.scene.summary()))
                .map_err(SessionError::Operator)?;

            for event in self.run_turn().await? {
                operator.notify(&event).map_err(SessionError::Operator)?;
            }

            let command = operator.next_command().map_err(SessionError::Operator)?;
            let event = self.apply(command).await?;
            operator.notify(&event).map_err(SessionError::Operator)?;
        }

        tracing::info!(session = %self.id, turns = self.turns, "Session complete");
        Ok(self.turns)
    }
}
