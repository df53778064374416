//! Session configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::context_assembler::AssemblerConfig;

/// Prompt used when the narrator asks for a generated challenge.
pub const DEFAULT_CHALLENGE_PROMPT: &str =
    "Generate an unexpected challenge for the current scene involving a market and a relic.";

/// Number of characters a session runs with.
pub const CAST_SIZE: usize = 2;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where one character's profile and dialogue log live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSource {
    pub profile: PathBuf,
    pub history: PathBuf,
}

/// Everything needed to set up a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_challenge_prompt")]
    pub challenge_prompt: String,

    /// Scene source. `None` starts from the default scene.
    #[serde(default)]
    pub scene: Option<PathBuf>,

    #[serde(default)]
    pub assembler: AssemblerConfig,

    pub characters: Vec<CharacterSource>,
}

fn default_challenge_prompt() -> String {
    DEFAULT_CHALLENGE_PROMPT.to_string()
}

impl SessionConfig {
    /// Create a configuration for two characters with defaults elsewhere.
    pub fn new(first: CharacterSource, second: CharacterSource) -> Self {
        Self {
            challenge_prompt: default_challenge_prompt(),
            scene: None,
            assembler: AssemblerConfig::default(),
            characters: vec![first, second],
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file; relative paths inside resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        tracing::debug!(path = %path.display(), "Loaded session config");
        Ok(config.resolve_paths(base))
    }

    /// Make every relative source path relative to `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        if let Some(scene) = self.scene.as_mut() {
            resolve(scene);
        }
        for source in &mut self.characters {
            resolve(&mut source.profile);
            resolve(&mut source.history);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.characters.len() != CAST_SIZE {
            return Err(ConfigError::Invalid(format!(
                "expected {} characters, found {}",
                CAST_SIZE,
                self.characters.len()
            )));
        }
        if self.challenge_prompt.trim().is_empty() {
            return Err(ConfigError::Invalid("challenge_prompt is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKET_TOML: &str = r#"
scene = "Scenes/market-square.json"

[assembler]
window_size = 5

[[characters]]
profile = "Characters/kai-static.json"
history = "Characters/kai-dialogue.json"

[[characters]]
profile = "Characters/elena-static.json"
history = "Characters/elena-dialogue.json"
"#;

    #[test]
    fn test_parse_config() {
        let config = SessionConfig::from_toml_str(MARKET_TOML).unwrap();

        assert_eq!(config.challenge_prompt, DEFAULT_CHALLENGE_PROMPT);
        assert_eq!(config.assembler.window_size, 5);
        assert_eq!(config.scene, Some(PathBuf::from("Scenes/market-square.json")));
        assert_eq!(config.characters[1].profile, PathBuf::from("Characters/elena-static.json"));
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
[[characters]]
profile = "a.json"
history = "a-log.json"

[[characters]]
profile = "b.json"
history = "b-log.json"
"#,
        )
        .unwrap();

        assert!(config.scene.is_none());
        assert_eq!(config.assembler.window_size, 3);
    }

    #[test]
    fn test_requires_two_characters() {
        let err = SessionConfig::from_toml_str(
            r#"
[[characters]]
profile = "a.json"
history = "a-log.json"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SessionConfig::from_toml_str("characters = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_resolve_paths() {
        let config = SessionConfig::from_toml_str(MARKET_TOML)
            .unwrap()
            .resolve_paths(Path::new("/drama"));

        assert_eq!(
            config.scene,
            Some(PathBuf::from("/drama/Scenes/market-square.json"))
        );
        assert_eq!(
            config.characters[0].history,
            PathBuf::from("/drama/Characters/kai-dialogue.json")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        fs::write(&path, MARKET_TOML).unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.characters[0].profile, dir.path().join("Characters/kai-static.json"));
    }
}
