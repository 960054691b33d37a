//! Session configuration
//!
//! Endpoints, namespaces and selection behaviour for an editing session.
//! Defaults target the public platform servers; every endpoint can be
//! overridden from a JSON file or `SOUNDPACK_*` environment variables.

use std::env;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SoundpackError};
use crate::sounds::SelectionPolicy;

/// Placeholder replaced by the mod revision in `mod_sounds_url`
pub const REVISION_PLACEHOLDER: &str = "{revision}";
/// Placeholder replaced by the platform version in `generated_sounds_url`
pub const VERSION_PLACEHOLDER: &str = "{version}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Namespace used when a reference has no `namespace:` prefix
    pub platform_namespace: String,
    /// Namespace of the sound mod whose table the pack edits
    pub mod_namespace: String,
    /// Platform version manifest
    pub version_manifest_url: String,
    /// Base of hash-addressed platform assets
    pub resources_url: String,
    /// Version → pack format table (plain JSON or a gist listing)
    pub pack_formats_url: String,
    /// File to pick when `pack_formats_url` returns a gist listing
    pub pack_formats_file: String,
    /// Mod sounds table for a revision; `{revision}` is substituted
    pub mod_sounds_url: String,
    /// Mod release tags
    pub mod_tags_url: String,
    /// Auto-generated mod sounds for a platform version; `{version}` is substituted
    pub generated_sounds_url: Option<String>,
    /// Forwarding proxy for hosts that refuse cross-origin requests
    pub proxy_url: Option<String>,
    /// Platform sound entries dropped at load (music is never previewed)
    pub excluded_sound_prefixes: Vec<String>,
    pub selection_policy: SelectionPolicy,
    /// Fixed seed for reproducible entry selection
    pub selection_seed: Option<u64>,
    pub request_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            platform_namespace: "minecraft".to_string(),
            mod_namespace: "extrasounds".to_string(),
            version_manifest_url:
                "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json".to_string(),
            resources_url: "https://resources.download.minecraft.net".to_string(),
            pack_formats_url: "https://api.github.com/gists/db752e2c19505c6b0e4cc4a944da3dc0"
                .to_string(),
            pack_formats_file: "minecraft_res_pack_format.json".to_string(),
            mod_sounds_url: "https://api.github.com/repos/lonefelidae16/extra-sounds/contents/src/main/resources/assets/extrasounds/sounds.json?ref={revision}".to_string(),
            mod_tags_url: "https://api.github.com/repos/lonefelidae16/extra-sounds/tags"
                .to_string(),
            generated_sounds_url: None,
            proxy_url: None,
            excluded_sound_prefixes: vec!["music.".to_string(), "music_disc.".to_string()],
            selection_policy: SelectionPolicy::Uniform,
            selection_seed: None,
            request_timeout_secs: 30,
        }
    }
}

impl SessionConfig {
    /// Load a configuration file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SoundpackError::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| SoundpackError::Config {
            reason: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SOUNDPACK_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("SOUNDPACK_MANIFEST_URL") {
            self.version_manifest_url = url;
        }
        if let Ok(url) = env::var("SOUNDPACK_RESOURCES_URL") {
            self.resources_url = url;
        }
        if let Ok(url) = env::var("SOUNDPACK_PACK_FORMATS_URL") {
            self.pack_formats_url = url;
        }
        if let Ok(url) = env::var("SOUNDPACK_PROXY_URL") {
            self.proxy_url = Some(url);
        }
        if let Some(secs) = env::var("SOUNDPACK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.request_timeout_secs = secs;
        }
        debug!("Session config: {:?}", self);
        self
    }

    /// Reject configurations that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.platform_namespace.is_empty() || self.mod_namespace.is_empty() {
            return Err(SoundpackError::Config {
                reason: "namespaces must not be empty".to_string(),
            });
        }
        if !self.mod_sounds_url.contains(REVISION_PLACEHOLDER) {
            return Err(SoundpackError::Config {
                reason: format!("mod_sounds_url must contain {}", REVISION_PLACEHOLDER),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(SoundpackError::Config {
                reason: "request_timeout_secs must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Mod sounds URL for a revision
    pub fn mod_sounds_url_for(&self, revision: &str) -> String {
        self.mod_sounds_url
            .replace(REVISION_PLACEHOLDER, &url_escape(revision))
    }

    /// Generated sounds URL for a platform version, if configured
    pub fn generated_sounds_url_for(&self, version: &str) -> Option<String> {
        self.generated_sounds_url
            .as_ref()
            .map(|template| template.replace(VERSION_PLACEHOLDER, version))
    }
}

/// Percent-encode a revision for use in a query string
fn url_escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
