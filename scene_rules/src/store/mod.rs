//! JSON persistence for character profiles, dialogue logs and scenes.
//!
//! Profiles and scenes are read-only inputs; dialogue logs are rewritten in
//! full after every turn. Field names are matched case-insensitively on read
//! and always written in snake_case with stable pretty-printing.

mod keys;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::{Character, DialogueEntry};
use crate::scene_state::SceneState;

const PROFILE_FIELDS: &[&str] = &["name", "backstory", "description", "traits", "equipment"];
const HISTORY_FIELDS: &[&str] = &["dialogues"];
const ENTRY_FIELDS: &[&str] = &["timestamp", "line"];
const SCENE_FIELDS: &[&str] = &[
    "scene_name",
    "description",
    "states",
    "challenges",
    "notable_locations",
    "background_sounds",
    "is_complete",
];

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("malformed data in {source_name}: {source}")]
    Malformed {
        source_name: String,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk wrapper around a dialogue log, as written.
#[derive(Serialize)]
struct HistoryRecord<'a> {
    dialogues: &'a [DialogueEntry],
}

/// On-disk wrapper around a dialogue log, as read. Entries stay raw until
/// their keys are folded.
#[derive(Deserialize)]
struct RawHistoryRecord {
    #[serde(default)]
    dialogues: Option<Vec<Value>>,
}

fn parse<T: serde::de::DeserializeOwned>(
    reader: impl Read,
    source_name: &str,
    fields: &[&str],
) -> Result<T, StoreError> {
    let malformed = |source| StoreError::Malformed {
        source_name: source_name.to_string(),
        source,
    };

    let mut value: Value = serde_json::from_reader(reader).map_err(malformed)?;
    keys::canonicalize(&mut value, fields);
    serde_json::from_value(value).map_err(malformed)
}

/// Load a character profile from a file.
///
/// A missing file is [`StoreError::NotFound`]; a character cannot be
/// invented the way a scene can.
pub fn load_profile(path: impl AsRef<Path>) -> Result<Character, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StoreError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = fs::File::open(path)?;
    let character = read_profile(file, &path.display().to_string())?;
    tracing::debug!(character = character.name(), path = %path.display(), "Loaded profile");
    Ok(character)
}

/// Read a character profile from any reader.
pub fn read_profile(reader: impl Read, source_name: &str) -> Result<Character, StoreError> {
    parse(reader, source_name, PROFILE_FIELDS)
}

/// Populate a character's dialogue log from a file.
///
/// A missing or empty file leaves the character with an empty log.
pub fn load_history(character: &mut Character, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(character = character.name(), path = %path.display(), "No history file, starting empty");
        character.replace_history(Vec::new());
        return Ok(());
    }

    let content = fs::read(path)?;
    read_history(character, content.as_slice(), &path.display().to_string())?;
    tracing::debug!(
        character = character.name(),
        entries = character.dialogue_history().len(),
        "Loaded dialogue history"
    );
    Ok(())
}

/// Populate a character's dialogue log from any reader.
pub fn read_history(
    character: &mut Character,
    mut reader: impl Read,
    source_name: &str,
) -> Result<(), StoreError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    if content.trim().is_empty() {
        character.replace_history(Vec::new());
        return Ok(());
    }

    let record: RawHistoryRecord = parse(content.as_bytes(), source_name, HISTORY_FIELDS)?;

    let entries = record
        .dialogues
        .unwrap_or_default()
        .into_iter()
        .map(|mut entry| {
            keys::canonicalize(&mut entry, ENTRY_FIELDS);
            serde_json::from_value::<DialogueEntry>(entry).map_err(|source| StoreError::Malformed {
                source_name: source_name.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    character.replace_history(entries);
    Ok(())
}

/// Write the full dialogue log to a file, replacing its contents.
pub fn save_history(character: &Character, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let mut buffer = Vec::new();
    write_history(character, &mut buffer)?;
    fs::write(path, buffer)?;

    tracing::debug!(
        character = character.name(),
        entries = character.dialogue_history().len(),
        path = %path.display(),
        "Saved dialogue history"
    );
    Ok(())
}

/// Serialize the full dialogue log as pretty JSON with a trailing newline.
pub fn write_history(character: &Character, mut writer: impl Write) -> Result<(), StoreError> {
    let record = HistoryRecord {
        dialogues: character.dialogue_history(),
    };
    serde_json::to_writer_pretty(&mut writer, &record).map_err(|source| StoreError::Malformed {
        source_name: character.name().to_string(),
        source,
    })?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Load a scene, falling back to `default_factory` when the file is
/// missing, unreadable or malformed.
pub fn load_scene(path: impl AsRef<Path>, default_factory: impl FnOnce() -> SceneState) -> SceneState {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "Scene file not found, using default scene");
        return default_factory();
    }

    let result = fs::File::open(path)
        .map_err(StoreError::from)
        .and_then(|file| read_scene(file, &path.display().to_string()));

    match result {
        Ok(scene) => {
            tracing::debug!(scene = %scene.scene_name, "Loaded scene");
            scene
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unusable scene file, using default scene");
            default_factory()
        }
    }
}

/// Read a scene from any reader.
pub fn read_scene(reader: impl Read, source_name: &str) -> Result<SceneState, StoreError> {
    parse(reader, source_name, SCENE_FIELDS)
}
