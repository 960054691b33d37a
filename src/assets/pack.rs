//! Resource pack: archive, metadata and the user-authored sounds table
//!
//! Layout of a pack:
//! ```text
//! pack.mcmeta                      # { "pack": { "pack_format", "description", "target_version" } }
//! assets/<mod>/sounds.json         # user-authored definition layer
//! assets/<namespace>/sounds/**.ogg # bundled audio
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::container::ResourceContainer;
use crate::error::{Result, SoundpackError};
use crate::sounds::SoundDefinitionSet;
use crate::version::{PackFormatTable, LATEST};

/// Metadata file at the archive root
pub const META_FILE: &str = "pack.mcmeta";

const DEFAULT_DESCRIPTION: &str = "Generated with soundpack";

/// Path of the sounds table for a mod namespace
pub fn sounds_file(mod_namespace: &str) -> String {
    format!("assets/{}/sounds.json", mod_namespace)
}

/// `pack` section of the metadata file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSection {
    #[serde(default)]
    pub pack_format: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "x_mc_version", skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,
}

/// Contents of `pack.mcmeta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackMeta {
    pub pack: PackSection,
}

impl Default for PackMeta {
    fn default() -> Self {
        Self {
            pack: PackSection {
                pack_format: 0,
                description: DEFAULT_DESCRIPTION.to_string(),
                target_version: Some(LATEST.to_string()),
            },
        }
    }
}

/// A loaded resource pack
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePack {
    pub meta: PackMeta,
    /// User-authored sounds for the mod namespace
    pub sounds: SoundDefinitionSet,
    mod_namespace: String,
    container: ResourceContainer,
}

impl ResourcePack {
    /// Blank pack with default metadata
    pub fn new(mod_namespace: &str) -> Self {
        Self {
            meta: PackMeta::default(),
            sounds: SoundDefinitionSet::new(),
            mod_namespace: mod_namespace.to_string(),
            container: ResourceContainer::new(),
        }
    }

    /// Load a pack from zip bytes.
    ///
    /// # Errors
    /// - the bytes are not a readable archive
    /// - the mod's sounds table is missing or unparseable
    ///
    /// A missing or broken `pack.mcmeta` falls back to default metadata.
    pub fn load(bytes: &[u8], mod_namespace: &str) -> Result<Self> {
        let container =
            ResourceContainer::from_zip_bytes(bytes).map_err(|e| SoundpackError::InvalidPackage {
                reason: format!("not a readable archive: {}", e),
            })?;
        Self::from_container(container, mod_namespace)
    }

    /// Build a pack from an already loaded container
    pub fn from_container(container: ResourceContainer, mod_namespace: &str) -> Result<Self> {
        let sounds_path = sounds_file(mod_namespace);
        let raw_sounds = container
            .read(&sounds_path)
            .ok_or_else(|| SoundpackError::InvalidPackage {
                reason: format!("missing {}", sounds_path),
            })?;
        let sounds: SoundDefinitionSet =
            serde_json::from_slice(raw_sounds).map_err(|e| SoundpackError::InvalidPackage {
                reason: format!("{}: {}", sounds_path, e),
            })?;

        let meta = match container.read(META_FILE) {
            Some(raw) => serde_json::from_slice(raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable {}: {}", META_FILE, e);
                PackMeta::default()
            }),
            None => PackMeta::default(),
        };

        debug!(
            "Loaded pack: {} files, {} sound entries, pack_format {}",
            container.len(),
            sounds.len(),
            meta.pack.pack_format
        );

        Ok(Self {
            meta,
            sounds,
            mod_namespace: mod_namespace.to_string(),
            container,
        })
    }

    pub fn mod_namespace(&self) -> &str {
        &self.mod_namespace
    }

    pub fn container(&self) -> &ResourceContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut ResourceContainer {
        &mut self.container
    }

    pub fn pack_format(&self) -> u32 {
        self.meta.pack.pack_format
    }

    /// Platform version this pack targets.
    ///
    /// Uses `target_version` when present (`latest` resolves against the
    /// table), otherwise the version matching the declared `pack_format`.
    pub fn platform_version(&self, table: &PackFormatTable) -> Option<String> {
        match self.meta.pack.target_version.as_deref() {
            Some(LATEST) => table.latest_version().map(str::to_string),
            Some(version) if !version.is_empty() => Some(version.to_string()),
            _ => table.version_for(self.pack_format()),
        }
    }

    pub fn set_target_version(&mut self, version: &str) {
        self.meta.pack.target_version = Some(version.to_string());
    }

    /// Update `pack_format` to match a platform version
    pub fn set_pack_format_for(&mut self, version: &str, table: &PackFormatTable) -> Result<u32> {
        let format = table.format_for(version)?;
        self.meta.pack.pack_format = format;
        Ok(format)
    }

    /// Whether the declared `pack_format` is the one expected for `version`
    pub fn is_exact_format(&self, version: &str, table: &PackFormatTable) -> bool {
        table.is_exact_format(self.pack_format(), version)
    }

    /// Serialise metadata and sounds into the archive and return zip bytes
    pub fn export(&mut self) -> Result<Vec<u8>> {
        let meta = serde_json::to_vec_pretty(&self.meta)?;
        let sounds = serde_json::to_vec_pretty(&self.sounds)?;
        self.container.insert(META_FILE, meta);
        self.container.insert(&sounds_file(&self.mod_namespace), sounds);
        self.container.to_zip_bytes()
    }

    /// Suggested download name for an exported pack
    pub fn export_file_name(&self, table: &PackFormatTable) -> String {
        let version = self
            .platform_version(table)
            .unwrap_or_else(|| LATEST.to_string());
        format!("{}-resource-pack-{}.zip", self.mod_namespace, version)
    }
}
