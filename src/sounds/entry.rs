//! Sound entries
//!
//! In a sounds table an entry is either a bare string or an object with a
//! `type` field. Both shapes are normalised into [`SoundEntry`] when the
//! table is parsed, and turned back into the shortest shape on output.

use serde::{Deserialize, Serialize};

const AUDIO_EXTENSION: &str = ".ogg";

/// Optional attributes shared by file and event entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryProps {
    /// Volume factor in [0, 1]; clamped at playback, not here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    /// Pitch factor in [0.1, 2.0]; clamped at playback, not here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    /// Selection weight, at least 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attenuation_distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<bool>,
}

/// A single playable descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSoundEntry", into = "RawSoundEntry")]
pub enum SoundEntry {
    /// Direct reference to an audio file, `namespace:path` without extension
    File { name: String, props: EntryProps },
    /// Alias to another sound definition entry
    Event { name: String, props: EntryProps },
}

impl SoundEntry {
    /// Minimal file entry, equivalent to a bare string in JSON
    pub fn file(name: impl Into<String>) -> Self {
        SoundEntry::File {
            name: normalize_name(name.into()),
            props: EntryProps::default(),
        }
    }

    /// Event entry with default factors
    pub fn event(name: impl Into<String>) -> Self {
        SoundEntry::Event {
            name: normalize_name(name.into()),
            props: EntryProps::default(),
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.props_mut().volume = Some(volume);
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.props_mut().pitch = Some(pitch);
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.props_mut().weight = Some(weight);
        self
    }

    pub fn name(&self) -> &str {
        match self {
            SoundEntry::File { name, .. } | SoundEntry::Event { name, .. } => name,
        }
    }

    pub fn props(&self) -> &EntryProps {
        match self {
            SoundEntry::File { props, .. } | SoundEntry::Event { props, .. } => props,
        }
    }

    fn props_mut(&mut self) -> &mut EntryProps {
        match self {
            SoundEntry::File { props, .. } | SoundEntry::Event { props, .. } => props,
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, SoundEntry::Event { .. })
    }

    /// Volume multiplier, 1 when unspecified
    pub fn volume_factor(&self) -> f32 {
        self.props().volume.unwrap_or(1.0)
    }

    /// Pitch multiplier, 1 when unspecified
    pub fn pitch_factor(&self) -> f32 {
        self.props().pitch.unwrap_or(1.0)
    }

    /// Selection weight; missing or zero weights count as 1
    pub fn weight(&self) -> u32 {
        self.props().weight.unwrap_or(1).max(1)
    }
}

fn normalize_name(name: String) -> String {
    match name.strip_suffix(AUDIO_EXTENSION) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    Sound,
    Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSoundObject {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<RawKind>,
    #[serde(flatten)]
    props: EntryProps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSoundEntry {
    Name(String),
    Object(RawSoundObject),
}

impl From<RawSoundEntry> for SoundEntry {
    fn from(raw: RawSoundEntry) -> Self {
        match raw {
            RawSoundEntry::Name(name) => SoundEntry::file(name),
            RawSoundEntry::Object(object) => {
                let name = normalize_name(object.name);
                match object.kind {
                    Some(RawKind::Event) => SoundEntry::Event {
                        name,
                        props: object.props,
                    },
                    Some(RawKind::Sound) | None => SoundEntry::File {
                        name,
                        props: object.props,
                    },
                }
            }
        }
    }
}

impl From<SoundEntry> for RawSoundEntry {
    fn from(entry: SoundEntry) -> Self {
        match entry {
            SoundEntry::File { name, props } if props == EntryProps::default() => {
                RawSoundEntry::Name(name)
            }
            SoundEntry::File { name, props } => RawSoundEntry::Object(RawSoundObject {
                name,
                kind: None,
                props,
            }),
            SoundEntry::Event { name, props } => RawSoundEntry::Object(RawSoundObject {
                name,
                kind: Some(RawKind::Event),
                props,
            }),
        }
    }
}
