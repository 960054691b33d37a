//! Layered merging of sound definition tables
//!
//! For every overlay entry: if the base has no such entry, or the overlay
//! entry sets `replace`, the overlay entry wins wholesale. Otherwise the
//! overlay's sounds are appended after the base's and the base keeps its
//! own `replace` flag and subtitle. Overlays apply left to right.

use super::definition::{DefinitionLayer, SoundDefinitionSet};

/// Merge overlays onto a copy of `base`. Inputs are never modified.
pub fn merge(base: &SoundDefinitionSet, overlays: &[&SoundDefinitionSet]) -> SoundDefinitionSet {
    let mut merged = base.clone();
    for overlay in overlays {
        merge_into(&mut merged, overlay);
    }
    merged
}

/// Merge layers in order; the first layer is the base
pub fn merge_layers(layers: &[DefinitionLayer]) -> SoundDefinitionSet {
    match layers.split_first() {
        Some((base, rest)) => {
            let overlays: Vec<&SoundDefinitionSet> = rest.iter().map(|l| &l.set).collect();
            merge(&base.set, &overlays)
        }
        None => SoundDefinitionSet::new(),
    }
}

fn merge_into(target: &mut SoundDefinitionSet, overlay: &SoundDefinitionSet) {
    for (name, definition) in overlay.iter() {
        let appended = match target.get(name) {
            Some(existing) if !definition.replace => {
                let mut combined = existing.clone();
                combined.sounds.extend(definition.sounds.iter().cloned());
                combined
            }
            _ => definition.clone(),
        };
        target.insert(name, appended);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sounds::{LayerSource, SoundDefinition, SoundEntry};
    use pretty_assertions::assert_eq;

    fn set(entries: Vec<(&str, SoundDefinition)>) -> SoundDefinitionSet {
        entries.into_iter().collect()
    }

    fn files(names: &[&str]) -> Vec<SoundEntry> {
        names.iter().map(|n| SoundEntry::file(*n)).collect()
    }

    #[test]
    fn test_replace_wins_wholesale() {
        let base = set(vec![(
            "ambient.cave",
            SoundDefinition::new(files(&["minecraft:ambient/cave"])).with_subtitle("cave"),
        )]);
        let overlay = set(vec![(
            "ambient.cave",
            SoundDefinition::new(files(&["custom:drip"])).replacing(),
        )]);

        let merged = merge(&base, &[&overlay]);
        assert_eq!(merged.get("ambient.cave"), overlay.get("ambient.cave"));
    }

    #[test]
    fn test_append_keeps_base_flags() {
        let base = set(vec![(
            "block.stone.hit",
            SoundDefinition::new(files(&["a", "b"])).with_subtitle("hit"),
        )]);
        let overlay = set(vec![(
            "block.stone.hit",
            SoundDefinition::new(files(&["c"])).with_subtitle("ignored"),
        )]);

        let merged = merge(&base, &[&overlay]);
        let def = merged.get("block.stone.hit").unwrap();
        assert_eq!(def.sounds, files(&["a", "b", "c"]));
        assert_eq!(def.subtitle.as_deref(), Some("hit"));
        assert!(!def.replace);
    }

    #[test]
    fn test_new_key_is_added() {
        let base = set(vec![("a", SoundDefinition::new(files(&["x"])))]);
        let overlay = set(vec![("b", SoundDefinition::new(files(&["y"])))]);

        let merged = merge(&base, &[&overlay]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("b"), overlay.get("b"));
    }

    #[test]
    fn test_inputs_untouched() {
        let base = set(vec![("a", SoundDefinition::new(files(&["x"])))]);
        let overlay = set(vec![("a", SoundDefinition::new(files(&["y"])))]);
        let before = base.clone();

        let _ = merge(&base, &[&overlay]);
        assert_eq!(base, before);
    }

    #[test]
    fn test_associative_by_application() {
        let a = set(vec![("k", SoundDefinition::new(files(&["1"])))]);
        let b = set(vec![
            ("k", SoundDefinition::new(files(&["2"]))),
            ("j", SoundDefinition::new(files(&["j1"]))),
        ]);
        let c = set(vec![
            ("k", SoundDefinition::new(files(&["3"]))),
            ("j", SoundDefinition::new(files(&["j2"])).replacing()),
        ]);

        let stepwise = merge(&merge(&a, &[&b]), &[&c]);
        let at_once = merge(&a, &[&b, &c]);
        assert_eq!(stepwise, at_once);
        assert_eq!(at_once.get("k").unwrap().sounds, files(&["1", "2", "3"]));
        assert_eq!(at_once.get("j").unwrap().sounds, files(&["j2"]));
    }

    #[test]
    fn test_merge_layers() {
        let layers = vec![
            DefinitionLayer::new(
                LayerSource::Mod,
                "extrasounds",
                "1.20",
                set(vec![("k", SoundDefinition::new(files(&["gen"])))]),
            ),
            DefinitionLayer::new(
                LayerSource::Mod,
                "extrasounds",
                "dev",
                set(vec![("k", SoundDefinition::new(files(&["rev"])))]),
            ),
        ];

        let merged = merge_layers(&layers);
        assert_eq!(merged.get("k").unwrap().sounds, files(&["gen", "rev"]));
        assert!(merge_layers(&[]).is_empty());
    }
}
