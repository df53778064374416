//! Context Assembler - Builds the prompt a character speaks from.
//!
//! Assembly is a pure function of (subject, counterpart, scene):
//! 1. **Scene**: the scene description, verbatim
//! 2. **Identity**: subject name, backstory and description
//! 3. **Traits**: intelligence (required), dexterity and charisma, equipment
//! 4. **Interaction**: who the subject is talking to
//! 5. **Recent dialogue**: a bounded window of both characters' logs
//! 6. **Emotional framing**: emotion and motivation of the subject
//! 7. **Cue**: the subject speaks next

mod window;

pub use window::*;

use scene_rules::{Character, SceneState, TraitValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only trait a character must define.
pub const REQUIRED_TRAIT: &str = "intelligence";

/// Traits rendered with a zero default, in order.
pub const OPTIONAL_STAT_TRAITS: [&str; 2] = ["dexterity", "charisma"];

pub const DEFAULT_EMOTION: &str = "neutral";
pub const DEFAULT_MOTIVATION: &str = "no specific motivation";

/// Errors from context assembly.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("character '{character}' is missing required trait '{trait_name}'")]
    MissingTrait {
        character: String,
        trait_name: String,
    },
}

/// Configuration for context assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Number of recent entries taken from each dialogue log.
    pub window_size: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self { window_size: 3 }
    }
}

/// The context assembler builds prompts from characters and scene state.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    config: AssemblerConfig,
}

impl ContextAssembler {
    /// Create a new context assembler with the given configuration.
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Create a context assembler with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AssemblerConfig::default())
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Assemble the structured context for `subject` speaking to `counterpart`.
    ///
    /// # Errors
    ///
    /// [`ContextError::MissingTrait`] if the subject has no `intelligence`
    /// trait.
    pub fn assemble_context(
        &self,
        subject: &Character,
        counterpart: &Character,
        scene: &SceneState,
    ) -> Result<AssembledContext, ContextError> {
        Ok(AssembledContext {
            scene_description: scene.description.clone(),
            subject: self.extract_character_context(subject)?,
            counterpart_name: counterpart.name().to_string(),
            subject_dialogue: self.render_window(subject),
            counterpart_dialogue: self.render_window(counterpart),
            emotional_state: self.extract_emotional_state(subject),
        })
    }

    /// Assemble and render the prompt in one step.
    pub fn build_context(
        &self,
        subject: &Character,
        counterpart: &Character,
        scene: &SceneState,
    ) -> Result<String, ContextError> {
        Ok(self
            .assemble_context(subject, counterpart, scene)?
            .to_prompt_string())
    }

    /// Identity block and traits in their fixed order.
    fn extract_character_context(
        &self,
        character: &Character,
    ) -> Result<CharacterContext, ContextError> {
        let intelligence =
            character
                .traits
                .get(REQUIRED_TRAIT)
                .ok_or_else(|| ContextError::MissingTrait {
                    character: character.name().to_string(),
                    trait_name: REQUIRED_TRAIT.to_string(),
                })?;

        let zero = TraitValue::Int(0);
        let [dexterity, charisma] =
            OPTIONAL_STAT_TRAITS.map(|name| character.traits.get(name).unwrap_or(&zero).to_string());

        Ok(CharacterContext {
            name: character.name().to_string(),
            backstory: character.backstory.clone(),
            description: character.description.clone(),
            intelligence: intelligence.to_string(),
            dexterity,
            charisma,
            equipment: character.equipment.join(", "),
        })
    }

    fn render_window(&self, character: &Character) -> DialogueContext {
        DialogueContext {
            speaker: character.name().to_string(),
            lines: DialogueWindow::recent(character.dialogue_history(), self.config.window_size)
                .render(),
        }
    }

    fn extract_emotional_state(&self, character: &Character) -> EmotionalState {
        EmotionalState {
            emotion: character
                .traits
                .text_or("emotion", DEFAULT_EMOTION)
                .to_string(),
            motivation: character
                .traits
                .text_or("motivation", DEFAULT_MOTIVATION)
                .to_string(),
        }
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Build a prompt with the default window size.
pub fn build_context(
    subject: &Character,
    counterpart: &Character,
    scene: &SceneState,
) -> Result<String, ContextError> {
    ContextAssembler::with_defaults().build_context(subject, counterpart, scene)
}

/// The assembled context ready for prompt generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    pub scene_description: String,
    pub subject: CharacterContext,
    pub counterpart_name: String,
    pub subject_dialogue: DialogueContext,
    pub counterpart_dialogue: DialogueContext,
    pub emotional_state: EmotionalState,
}

impl AssembledContext {
    /// Format the context as a prompt string.
    pub fn to_prompt_string(&self) -> String {
        let name = &self.subject.name;
        let mut prompt = String::new();

        prompt.push_str("Scene:\n");
        prompt.push_str(&self.scene_description);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("{}'s perspective:\n", name));
        prompt.push_str(&format!("Backstory: {}\n", self.subject.backstory));
        prompt.push_str(&format!("Description: {}\n", self.subject.description));
        prompt.push_str(&format!(
            "Traits: Intelligence: {}, Dexterity: {}, Charisma: {}\n",
            self.subject.intelligence, self.subject.dexterity, self.subject.charisma
        ));
        prompt.push_str(&format!("Equipment: {}\n\n", self.subject.equipment));

        prompt.push_str(&format!(
            "{} is currently interacting with {}.\n",
            name, self.counterpart_name
        ));
        prompt.push_str("Recent dialogue history:\n");
        for dialogue in [&self.subject_dialogue, &self.counterpart_dialogue] {
            prompt.push_str(&format!("{}:\n{}\n", dialogue.speaker, dialogue.lines));
        }
        prompt.push('\n');

        prompt.push_str(&format!(
            "{} is feeling {} and is motivated by {}. Respond in a way that reflects this emotional state.\n\n",
            name, self.emotional_state.emotion, self.emotional_state.motivation
        ));

        prompt.push_str(&format!("{}'s next response:", name));
        prompt
    }
}

/// Identity and trait block of the speaking character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterContext {
    pub name: String,
    pub backstory: String,
    pub description: String,
    pub intelligence: String,
    pub dexterity: String,
    pub charisma: String,
    /// Comma-joined; empty when the character carries nothing.
    pub equipment: String,
}

/// A rendered dialogue window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueContext {
    pub speaker: String,
    pub lines: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    pub emotion: String,
    pub motivation: String,
}
