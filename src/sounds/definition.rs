//! Sound definition tables and layers

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entry::SoundEntry;
use crate::error::{Result, SoundpackError};

/// One entry of a sounds table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundDefinition {
    #[serde(default)]
    pub sounds: Vec<SoundEntry>,
    /// Overlay replaces the base entry instead of appending to it
    #[serde(default, skip_serializing_if = "is_false")]
    pub replace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SoundDefinition {
    pub fn new(sounds: Vec<SoundEntry>) -> Self {
        Self {
            sounds,
            replace: false,
            subtitle: None,
        }
    }

    pub fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// An entry is empty when nothing in it can be played
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty() || self.sounds.iter().all(|s| s.name().is_empty())
    }
}

/// Ordered mapping of entry name to definition.
///
/// Order is kept for display and export; resolution never depends on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundDefinitionSet {
    entries: IndexMap<String, SoundDefinition>,
}

impl SoundDefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a sounds table
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SoundpackError::malformed("sound definitions", e.to_string()))
    }

    /// Parse an already decoded sounds table
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| SoundpackError::malformed("sound definitions", e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, name: &str) -> Option<&SoundDefinition> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert or overwrite an entry, returning the previous definition
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: SoundDefinition,
    ) -> Option<SoundDefinition> {
        self.entries.insert(name.into(), definition)
    }

    pub fn remove(&mut self, name: &str) -> Option<SoundDefinition> {
        self.entries.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SoundDefinition)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of entries that have nothing playable
    pub fn empty_entries(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, def)| def.is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Copy of this set without entries whose name starts with any prefix
    pub fn without_prefixes(&self, prefixes: &[&str]) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(name, _)| !prefixes.iter().any(|p| name.starts_with(p)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, SoundDefinition)> for SoundDefinitionSet {
    fn from_iter<T: IntoIterator<Item = (K, SoundDefinition)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Where a definition layer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSource {
    /// Shipped with the platform
    Platform,
    /// Generated or published by the sound mod
    Mod,
    /// Authored in the loaded resource pack
    User,
}

/// A named, versioned sounds table before merging
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionLayer {
    pub source: LayerSource,
    /// Namespace the entries belong to
    pub namespace: String,
    /// Platform version or mod revision the table was fetched for
    pub version: String,
    pub set: SoundDefinitionSet,
}

impl DefinitionLayer {
    pub fn new(
        source: LayerSource,
        namespace: impl Into<String>,
        version: impl Into<String>,
        set: SoundDefinitionSet,
    ) -> Self {
        Self {
            source,
            namespace: namespace.into(),
            version: version.into(),
            set,
        }
    }
}
