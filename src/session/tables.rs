//! Derived session tables
//!
//! Everything resolution and location read, built as a whole for one
//! platform version and mod revision and never mutated afterwards.

use crate::assets::AssetIndex;
use crate::resolve::DefinitionsByNamespace;
use crate::sounds::{merge_layers, DefinitionLayer, LayerSource, SoundDefinitionSet};

#[derive(Debug, Clone, Default)]
pub struct SessionTables {
    pub platform_version: String,
    pub revision: String,
    /// Layers as loaded, in merge order
    pub layers: Vec<DefinitionLayer>,
    /// Merged table per namespace
    pub definitions: DefinitionsByNamespace,
    /// Platform sound files for `platform_version`
    pub asset_index: AssetIndex,
}

impl SessionTables {
    /// Merge `layers` per namespace, in the order given
    pub fn assemble(
        platform_version: impl Into<String>,
        revision: impl Into<String>,
        layers: Vec<DefinitionLayer>,
        asset_index: AssetIndex,
    ) -> Self {
        let mut definitions = DefinitionsByNamespace::new();
        let mut namespaces: Vec<&str> = Vec::new();
        for layer in &layers {
            if !namespaces.contains(&layer.namespace.as_str()) {
                namespaces.push(&layer.namespace);
            }
        }
        for namespace in namespaces {
            let group: Vec<DefinitionLayer> = layers
                .iter()
                .filter(|l| l.namespace == namespace)
                .cloned()
                .collect();
            definitions.insert(namespace.to_string(), merge_layers(&group));
        }

        Self {
            platform_version: platform_version.into(),
            revision: revision.into(),
            layers,
            definitions,
            asset_index,
        }
    }

    /// Same tables with the user layer replaced by `user`
    pub fn with_user_layer(&self, namespace: &str, user: &SoundDefinitionSet) -> Self {
        let mut layers: Vec<DefinitionLayer> = self
            .layers
            .iter()
            .filter(|l| l.source != LayerSource::User)
            .cloned()
            .collect();
        layers.push(DefinitionLayer::new(
            LayerSource::User,
            namespace,
            self.revision.as_str(),
            user.clone(),
        ));
        Self::assemble(
            self.platform_version.as_str(),
            self.revision.as_str(),
            layers,
            self.asset_index.clone(),
        )
    }

    pub fn definitions_for(&self, namespace: &str) -> Option<&SoundDefinitionSet> {
        self.definitions.get(namespace)
    }

    /// Every playable name: defined entries of every namespace plus the
    /// platform's sound files. Sorted case-insensitively, without duplicates.
    pub fn sound_names(&self, platform_namespace: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .definitions
            .iter()
            .flat_map(|(ns, set)| set.names().map(move |name| format!("{}:{}", ns, name)))
            .chain(self.asset_index.sound_names(platform_namespace))
            .collect();
        sort_names(&mut names);
        names
    }

    /// Defined entry names of one namespace, without prefix
    pub fn entry_names(&self, namespace: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .definitions
            .get(namespace)
            .map(|set| set.names().map(str::to_string).collect())
            .unwrap_or_default();
        sort_names(&mut names);
        names
    }
}

fn sort_names(names: &mut Vec<String>) {
    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    names.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sounds::{SoundDefinition, SoundEntry};
    use pretty_assertions::assert_eq;

    fn layer(source: LayerSource, namespace: &str, entries: &[(&str, &str)]) -> DefinitionLayer {
        let set: SoundDefinitionSet = entries
            .iter()
            .map(|(name, file)| (*name, SoundDefinition::new(vec![SoundEntry::file(*file)])))
            .collect();
        DefinitionLayer::new(source, namespace, "1.20", set)
    }

    fn tables() -> SessionTables {
        let mut index = AssetIndex::new("https://res.test");
        index.insert("minecraft/sounds/Dig/stone1.ogg", "aa11");
        index.insert("minecraft/sounds/ambient/cave/cave1.ogg", "bb22");
        SessionTables::assemble(
            "1.20",
            "dev",
            vec![
                layer(LayerSource::Platform, "minecraft", &[("ambient.cave", "ambient/cave/cave1")]),
                layer(LayerSource::Mod, "extrasounds", &[("gui.click", "gui/click")]),
                layer(LayerSource::User, "extrasounds", &[("gui.click", "custom/click")]),
            ],
            index,
        )
    }

    #[test]
    fn test_layers_merge_per_namespace() {
        let tables = tables();
        let click = tables.definitions_for("extrasounds").unwrap().get("gui.click").unwrap();
        let names: Vec<&str> = click.sounds.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["gui/click", "custom/click"]);
        assert_eq!(tables.definitions_for("minecraft").unwrap().len(), 1);
    }

    #[test]
    fn test_sound_names_sorted_case_insensitive() {
        assert_eq!(
            tables().sound_names("minecraft"),
            vec![
                "extrasounds:gui.click",
                "minecraft:ambient.cave",
                "minecraft:ambient/cave/cave1",
                "minecraft:Dig/stone1",
            ]
        );
    }

    #[test]
    fn test_user_layer_is_replaced() {
        let user: SoundDefinitionSet = vec![(
            "gui.click",
            SoundDefinition::new(vec![SoundEntry::file("custom/other")]).replacing(),
        )]
        .into_iter()
        .collect();

        let rebuilt = tables().with_user_layer("extrasounds", &user);
        let click = rebuilt.definitions_for("extrasounds").unwrap().get("gui.click").unwrap();
        assert_eq!(click.sounds, vec![SoundEntry::file("custom/other")]);
        assert_eq!(rebuilt.layers.len(), 3);
        assert_eq!(rebuilt.entry_names("extrasounds"), vec!["gui.click"]);
    }
}
