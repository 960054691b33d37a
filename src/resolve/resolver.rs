//! Event resolution
//!
//! Walks event aliases through the merged definition tables until a file
//! is reached, multiplying volume and pitch along the way. Every visited
//! `namespace:name` is remembered, so self references and longer loops
//! end in [`SoundpackError::CyclicSoundReference`] instead of spinning.

use std::collections::{HashMap, HashSet};

use log::trace;
use rand::Rng;

use super::reference::SoundRef;
use crate::error::{Result, SoundpackError};
use crate::sounds::{EntryPicker, SoundDefinitionSet};

/// Merged definition tables keyed by namespace
pub type DefinitionsByNamespace = HashMap<String, SoundDefinitionSet>;

/// A terminal sound path with its composed factors
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Logical path, `{namespace}/sounds/{name}.ogg`
    pub path: String,
    /// Product of the starting volume and every traversed entry's volume
    pub volume: f32,
    /// Product of the starting pitch and every traversed entry's pitch
    pub pitch: f32,
    /// Number of definition lookups performed
    pub dereferences: usize,
}

/// Resolves references against one snapshot of the definition tables
pub struct SoundResolver<'a, R> {
    definitions: &'a DefinitionsByNamespace,
    default_namespace: &'a str,
    picker: EntryPicker,
    rng: R,
}

impl<'a, R: Rng> SoundResolver<'a, R> {
    pub fn new(
        definitions: &'a DefinitionsByNamespace,
        default_namespace: &'a str,
        picker: EntryPicker,
        rng: R,
    ) -> Self {
        Self {
            definitions,
            default_namespace,
            picker,
            rng,
        }
    }

    /// Resolve `reference` to a terminal path.
    ///
    /// When `is_event` is false the reference already names a file and is
    /// returned as is. Otherwise entries are looked up and picked until a
    /// file entry is reached.
    ///
    /// # Errors
    /// - `InvalidReference` for an unparseable name
    /// - `UnknownSoundEntry` when an event is not defined
    /// - `EmptySoundEntry` when an event has no sounds or the picked sound
    ///   has no name
    /// - `CyclicSoundReference` when an event is reached twice
    pub fn resolve(
        &mut self,
        reference: &str,
        volume: f32,
        pitch: f32,
        is_event: bool,
    ) -> Result<Resolution> {
        let definitions = self.definitions;
        let mut current = SoundRef::parse(reference, self.default_namespace)?;
        let mut is_event = is_event;
        let mut volume = volume;
        let mut pitch = pitch;
        let mut chain: Vec<String> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();

        loop {
            if !is_event {
                return Ok(Resolution {
                    path: current.sound_path(),
                    volume,
                    pitch,
                    dereferences: chain.len(),
                });
            }

            let key = current.to_string();
            chain.push(key.clone());
            if !visited.insert(key.clone()) {
                return Err(SoundpackError::CyclicSoundReference { chain });
            }

            let definition = definitions
                .get(&current.namespace)
                .and_then(|set| set.get(&current.name))
                .ok_or_else(|| SoundpackError::UnknownSoundEntry { name: key.clone() })?;

            let entry = self
                .picker
                .pick(&definition.sounds, &mut self.rng)
                .filter(|entry| !entry.name().is_empty())
                .ok_or(SoundpackError::EmptySoundEntry { name: key })?;

            volume *= entry.volume_factor();
            pitch *= entry.pitch_factor();
            trace!(
                "{} -> {} (event: {}, volume {:.3}, pitch {:.3})",
                current,
                entry.name(),
                entry.is_event(),
                volume,
                pitch
            );

            current = SoundRef::parse(entry.name(), self.default_namespace)?;
            is_event = entry.is_event();
        }
    }
}
