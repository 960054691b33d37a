//! Mod revision catalog
//!
//! Release tags of the sound mod carry the platform version they target
//! in their name (e.g. `mc1.19.4-v2`). The catalog extracts it so a
//! session can be retargeted by tag alone.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::compare::sort_versions;
use crate::error::{Result, SoundpackError};

/// Revision used when no tag is requested
pub const DEFAULT_REVISION: &str = "dev";

/// A tagged release of the sound mod
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModRevision {
    /// Tag name
    pub tag: String,
    /// Commit the tag points at
    pub commit: String,
    /// Platform version parsed from the tag
    pub platform_version: String,
}

/// Extract the platform version embedded in a tag name.
///
/// Three-part versions win over two-part ones.
pub fn platform_version_in_tag(tag: &str) -> Option<String> {
    static WITH_PATCH: OnceLock<Regex> = OnceLock::new();
    static WITHOUT_PATCH: OnceLock<Regex> = OnceLock::new();

    let with_patch = WITH_PATCH.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+").expect("valid regex"));
    let without_patch =
        WITHOUT_PATCH.get_or_init(|| Regex::new(r"\d+\.\d+").expect("valid regex"));

    with_patch
        .find(tag)
        .or_else(|| without_patch.find(tag))
        .map(|m| m.as_str().to_string())
}

/// Known revisions, in the order the tag list returned them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionCatalog {
    revisions: Vec<ModRevision>,
}

impl RevisionCatalog {
    pub fn new(revisions: Vec<ModRevision>) -> Self {
        Self { revisions }
    }

    /// Parse a tag listing of the form `[{ "name": ..., "commit": { "sha": ... } }]`.
    ///
    /// Tags without a recognisable platform version are skipped.
    pub fn from_tags(value: &Value) -> Result<Self> {
        let tags = value
            .as_array()
            .ok_or_else(|| SoundpackError::malformed("revision tags", "expected an array"))?;

        let revisions = tags
            .iter()
            .filter_map(|tag| {
                let name = tag.get("name")?.as_str()?;
                let commit = tag
                    .get("commit")
                    .and_then(|c| c.get("sha"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let platform_version = platform_version_in_tag(name)?;
                Some(ModRevision {
                    tag: name.to_string(),
                    commit: commit.to_string(),
                    platform_version,
                })
            })
            .collect();

        Ok(Self { revisions })
    }

    pub fn revisions(&self) -> &[ModRevision] {
        &self.revisions
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Platform version targeted by `tag`, if the tag is known
    pub fn platform_version_for(&self, tag: &str) -> Option<&str> {
        self.revisions
            .iter()
            .find(|rev| rev.tag == tag)
            .map(|rev| rev.platform_version.as_str())
    }

    /// Newest tag targeting `platform_version`, or the default revision
    pub fn latest_tag_for(&self, platform_version: &str) -> String {
        let tags: Vec<&str> = self
            .revisions
            .iter()
            .filter(|rev| rev.platform_version == platform_version)
            .map(|rev| rev.tag.as_str())
            .collect();
        sort_versions(&tags, true)
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_REVISION.to_string())
    }
}
