//! Field-name folding for hand-authored JSON.
//!
//! Profiles written by hand (or by older tools) spell fields as `Name`,
//! `sceneName` or `scene_name`. Keys are folded to the canonical snake_case
//! field before handing the value to serde.

use serde_json::Value;

/// Lowercase and drop separators, so `SceneName`, `sceneName` and
/// `scene_name` all fold to `scenename`.
fn fold(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Rename the keys of a JSON object that match one of `fields` when folded.
///
/// Unknown keys are left untouched. Non-objects are ignored.
pub(crate) fn canonicalize(value: &mut Value, fields: &[&str]) {
    let Value::Object(map) = value else {
        return;
    };

    let renames: Vec<(String, &str)> = map
        .keys()
        .filter_map(|key| {
            let folded = fold(key);
            fields
                .iter()
                .find(|field| fold(field) == folded)
                .filter(|field| **field != key.as_str())
                .map(|field| (key.clone(), *field))
        })
        .collect();

    for (from, to) in renames {
        if let Some(v) = map.remove(&from) {
            // An exactly spelled key wins over a folded duplicate.
            map.entry(to.to_string()).or_insert(v);
        }
    }
}
