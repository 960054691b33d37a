//! Pack format compatibility table
//!
//! Maps platform versions to the integer `pack_format` a resource pack
//! declares. The table is sparse: versions without an entry use the
//! format of the closest older version that has one.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde_json::Value;

use super::compare::{compare_versions, sort_versions};
use crate::error::{Result, SoundpackError};

/// Sentinel accepted wherever a version string is expected
pub const LATEST: &str = "latest";

/// A request for a platform version, before it is pinned to a concrete one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// Newest version known to the table at the time of the request
    Latest,
    /// A concrete version string
    Exact(String),
}

impl VersionRequest {
    pub fn parse(input: &str) -> Self {
        if input.is_empty() || input == LATEST {
            VersionRequest::Latest
        } else {
            VersionRequest::Exact(input.to_string())
        }
    }
}

/// Immutable version → pack format table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackFormatTable {
    formats: IndexMap<String, u32>,
    /// Newest version, computed once when the table is built
    latest: Option<String>,
}

impl PackFormatTable {
    /// Create an empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from version/format pairs, keeping their order
    pub fn from_map<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let formats: IndexMap<String, u32> =
            entries.into_iter().map(|(v, f)| (v.into(), f)).collect();
        let versions: Vec<&str> = formats.keys().map(String::as_str).collect();
        let latest = sort_versions(&versions, true).into_iter().next();
        Self { formats, latest }
    }

    /// Parse a flat JSON object of `version: format`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SoundpackError::malformed("pack formats", e.to_string()))?;
        Self::from_value(&value)
    }

    /// Build a table from an already parsed JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| SoundpackError::malformed("pack formats", "expected an object"))?;

        let mut entries = Vec::with_capacity(object.len());
        for (version, format) in object {
            let format = format
                .as_u64()
                .and_then(|f| u32::try_from(f).ok())
                .ok_or_else(|| {
                    SoundpackError::malformed(
                        "pack formats",
                        format!("format for {} is not a non-negative integer", version),
                    )
                })?;
            entries.push((version.clone(), format));
        }
        Ok(Self::from_map(entries))
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Iterate versions in table order
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// Newest version in the table
    pub fn latest_version(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    /// Resolve a version request to a concrete version string.
    ///
    /// `Latest` resolves against this table exactly once; callers keep the
    /// returned string so later reloads of the table cannot move them.
    pub fn pin(&self, request: &VersionRequest) -> Option<String> {
        match request {
            VersionRequest::Latest => self.latest.clone(),
            VersionRequest::Exact(version) => Some(version.clone()),
        }
    }

    /// Find the pack format for a platform version.
    ///
    /// Uses the exact entry when present, otherwise the format of the
    /// newest known version that is not newer than `version`.
    pub fn format_for(&self, version: &str) -> Result<u32> {
        let version = if version == LATEST {
            self.latest
                .as_deref()
                .ok_or_else(|| SoundpackError::NoCompatibleFormat {
                    version: version.to_string(),
                })?
        } else {
            version
        };

        if let Some(format) = self.formats.get(version) {
            return Ok(*format);
        }

        let known: Vec<&str> = self.versions().collect();
        sort_versions(&known, true)
            .into_iter()
            .find(|candidate| compare_versions(version, candidate) != Ordering::Less)
            .and_then(|candidate| self.formats.get(&candidate).copied())
            .ok_or_else(|| SoundpackError::NoCompatibleFormat {
                version: version.to_string(),
            })
    }

    /// Find the first version declaring `format`.
    ///
    /// Format `0` and unknown formats map to the newest version.
    pub fn version_for(&self, format: u32) -> Option<String> {
        if format != 0 {
            if let Some((version, _)) = self.formats.iter().find(|(_, f)| **f == format) {
                return Some(version.clone());
            }
        }
        self.latest.clone()
    }

    /// Whether `format` is exactly the one expected for `version`
    pub fn is_exact_format(&self, format: u32, version: &str) -> bool {
        self.format_for(version).map_or(false, |expected| expected == format)
    }
}
