//! Content-hash index of platform assets
//!
//! Platform assets are stored by hash under
//! `{base_uri}/{first two hex chars}/{hash}`. The index maps logical
//! paths such as `minecraft/sounds/block/stone/hit1.ogg` to those hashes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SoundpackError};

/// One indexed object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct RawAssetIndex {
    #[serde(default)]
    objects: HashMap<String, AssetObject>,
}

/// Logical path → hash index for one platform version
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetIndex {
    base_uri: String,
    objects: HashMap<String, AssetObject>,
}

impl AssetIndex {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into().trim_end_matches('/').to_string(),
            objects: HashMap::new(),
        }
    }

    /// Parse an asset index document (`{ "objects": { path: { hash, size } } }`)
    pub fn from_value(value: Value, base_uri: impl Into<String>) -> Result<Self> {
        let raw: RawAssetIndex = serde_json::from_value(value)
            .map_err(|e| SoundpackError::malformed("asset index", e.to_string()))?;
        let mut index = Self::new(base_uri);
        index.objects = raw.objects;
        Ok(index)
    }

    pub fn insert(&mut self, path: impl Into<String>, hash: impl Into<String>) {
        self.objects.insert(
            path.into(),
            AssetObject {
                hash: hash.into(),
                size: 0,
            },
        );
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    pub fn hash_for(&self, path: &str) -> Option<&str> {
        self.objects.get(path).map(|o| o.hash.as_str())
    }

    /// Download location of an object with the given hash
    pub fn uri_for(&self, hash: &str) -> String {
        let prefix = hash.get(..2).unwrap_or(hash);
        format!("{}/{}/{}", self.base_uri, prefix, hash)
    }

    /// Keep only the sound files of `namespace`, minus its music
    /// directory, and its `sounds.json` so the table can be re-read later
    pub fn retain_sounds(&mut self, namespace: &str) {
        let music_dir = format!("{}/sounds/music/", namespace);
        let table = format!("{}/sounds.json", namespace);
        self.objects.retain(|path, _| {
            *path == table || (path.ends_with(".ogg") && !path.starts_with(&music_dir))
        });
    }

    /// Sound file names in `namespace:path` form, for every indexed `.ogg`
    /// under `{namespace}/sounds/`
    pub fn sound_names(&self, namespace: &str) -> Vec<String> {
        let prefix = format!("{}/sounds/", namespace);
        self.objects
            .keys()
            .filter_map(|path| {
                let rest = path.strip_prefix(&prefix)?;
                let stem = rest.strip_suffix(".ogg")?;
                Some(format!("{}:{}", namespace, stem))
            })
            .collect()
    }
}
