//! Error handling for Soundpack
//!
//! Soft failures (a sound that cannot be previewed) and hard failures
//! (a cyclic definition) share one error type; callers use
//! [`SoundpackError::is_recoverable`] to tell them apart.

use thiserror::Error;

/// Result type alias for Soundpack operations
pub type Result<T> = std::result::Result<T, SoundpackError>;

/// Main error type for Soundpack operations
#[derive(Error, Debug)]
pub enum SoundpackError {
    // Resolution Errors
    #[error("Unknown sound entry: {name}")]
    UnknownSoundEntry { name: String },

    #[error("Sound entry has no sounds: {name}")]
    EmptySoundEntry { name: String },

    #[error("Cyclic sound reference: {}", chain.join(" -> "))]
    CyclicSoundReference { chain: Vec<String> },

    #[error("Invalid sound reference: {reference}")]
    InvalidReference { reference: String },

    // Versioning Errors
    #[error("No compatible pack format for version {version}")]
    NoCompatibleFormat { version: String },

    #[error("Malformed table {table}: {reason}")]
    MalformedTable { table: String, reason: String },

    // Asset Errors
    #[error("Asset not found: {path}")]
    AssetNotFound { path: String },

    #[error("No resource pack is loaded")]
    NoPackageLoaded,

    #[error("Invalid resource pack: {reason}")]
    InvalidPackage { reason: String },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    // Remote Errors
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    // Configuration Errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SoundpackError {
    pub(crate) fn malformed(table: &str, reason: impl Into<String>) -> Self {
        SoundpackError::MalformedTable {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn fetch(url: &str, reason: impl ToString) -> Self {
        SoundpackError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SoundpackError::UnknownSoundEntry { .. } => "UNKNOWN_SOUND_ENTRY",
            SoundpackError::EmptySoundEntry { .. } => "EMPTY_SOUND_ENTRY",
            SoundpackError::CyclicSoundReference { .. } => "CYCLIC_SOUND_REFERENCE",
            SoundpackError::InvalidReference { .. } => "INVALID_REFERENCE",
            SoundpackError::NoCompatibleFormat { .. } => "NO_COMPATIBLE_FORMAT",
            SoundpackError::MalformedTable { .. } => "MALFORMED_TABLE",
            SoundpackError::AssetNotFound { .. } => "ASSET_NOT_FOUND",
            SoundpackError::NoPackageLoaded => "NO_PACKAGE_LOADED",
            SoundpackError::InvalidPackage { .. } => "INVALID_PACKAGE",
            SoundpackError::Archive(_) => "ARCHIVE_ERROR",
            SoundpackError::Fetch { .. } => "FETCH_ERROR",
            SoundpackError::Config { .. } => "CONFIG_ERROR",
            SoundpackError::Io(_) => "IO_ERROR",
            SoundpackError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error only affects a single preview and can be
    /// reported to the user without touching session state
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SoundpackError::UnknownSoundEntry { .. }
                | SoundpackError::EmptySoundEntry { .. }
                | SoundpackError::AssetNotFound { .. }
                | SoundpackError::NoPackageLoaded
        )
    }

    /// Get a user-facing recovery suggestion
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            SoundpackError::UnknownSoundEntry { .. } => {
                Some("Check the sound name and its namespace prefix.")
            }
            SoundpackError::EmptySoundEntry { .. } => {
                Some("Add at least one sound to the entry before previewing or exporting.")
            }
            SoundpackError::CyclicSoundReference { .. } => {
                Some("Break the loop by pointing one of the events at a sound file.")
            }
            SoundpackError::NoCompatibleFormat { .. } => {
                Some("Pick a newer platform version or refresh the pack format table.")
            }
            SoundpackError::AssetNotFound { .. } => {
                Some("Add the .ogg file to the resource pack or use a platform sound.")
            }
            SoundpackError::NoPackageLoaded => Some("Open a resource pack first."),
            SoundpackError::InvalidPackage { .. } => {
                Some("Make sure the zip contains pack.mcmeta and a sounds.json for the mod.")
            }
            SoundpackError::Fetch { .. } => Some("Check your connection and try again."),
            _ => None,
        }
    }
}
