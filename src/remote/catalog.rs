//! Remote table loaders
//!
//! Everything fetched here is optional for an editing session: a table
//! that cannot be fetched or parsed is logged and replaced by an empty one,
//! except for the asset index, without which nothing can be located.

use log::{debug, info, warn};
use serde_json::Value;

use super::source::TableSource;
use crate::assets::AssetIndex;
use crate::config::SessionConfig;
use crate::error::{Result, SoundpackError};
use crate::session::SessionTables;
use crate::sounds::{merge, DefinitionLayer, LayerSource, SoundDefinitionSet};
use crate::version::{PackFormatTable, RevisionCatalog, LATEST};

/// Fetch the version → pack format table.
///
/// The endpoint may serve the table itself or a gist listing whose
/// `files[<pack_formats_file>].raw_url` points at it.
pub async fn load_pack_formats<S: TableSource>(source: &S, config: &SessionConfig) -> PackFormatTable {
    match fetch_pack_formats(source, config).await {
        Ok(table) => {
            info!(
                "Loaded {} pack formats (latest {})",
                table.len(),
                table.latest_version().unwrap_or("none")
            );
            table
        }
        Err(e) => {
            warn!("Pack format table unavailable: {}", e);
            PackFormatTable::empty()
        }
    }
}

async fn fetch_pack_formats<S: TableSource>(
    source: &S,
    config: &SessionConfig,
) -> Result<PackFormatTable> {
    let document = source.fetch_json(&config.pack_formats_url).await?;
    let document = match document.get("files") {
        Some(files) => {
            let raw_url = files
                .get(&config.pack_formats_file)
                .and_then(|f| f.get("raw_url"))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    SoundpackError::malformed(
                        "pack formats",
                        format!("listing has no raw_url for {}", config.pack_formats_file),
                    )
                })?;
            source.fetch_json(raw_url).await?
        }
        None => document,
    };
    PackFormatTable::from_value(&document)
}

/// Fetch the mod's release tags
pub async fn load_revisions<S: TableSource>(source: &S, config: &SessionConfig) -> RevisionCatalog {
    let catalog = match source.fetch_json(&config.mod_tags_url).await {
        Ok(tags) => RevisionCatalog::from_tags(&tags),
        Err(e) => Err(e),
    };
    catalog.unwrap_or_else(|e| {
        warn!("Mod revisions unavailable: {}", e);
        RevisionCatalog::default()
    })
}

/// Newest release listed in the platform version manifest
pub async fn latest_release<S: TableSource>(source: &S, config: &SessionConfig) -> Result<String> {
    let manifest = source.fetch_json(&config.version_manifest_url).await?;
    latest_in_manifest(&manifest).map(str::to_string)
}

fn latest_in_manifest(manifest: &Value) -> Result<&str> {
    manifest
        .pointer("/latest/release")
        .and_then(Value::as_str)
        .ok_or_else(|| SoundpackError::malformed("version manifest", "no latest release"))
}

/// Fetch the platform asset index for `version`.
///
/// `latest` is pinned to the manifest's latest release; the concrete
/// version is returned alongside the index. The index covers every
/// object; sound filtering happens in [`build_tables`] once the platform
/// sounds table has been located.
pub async fn load_asset_index<S: TableSource>(
    source: &S,
    config: &SessionConfig,
    version: &str,
) -> Result<(String, AssetIndex)> {
    let manifest_url = config.version_manifest_url.as_str();
    let manifest = source.fetch_json(manifest_url).await?;

    let version = if version == LATEST {
        latest_in_manifest(&manifest)?
    } else {
        version
    };

    let version_url = manifest
        .get("versions")
        .and_then(Value::as_array)
        .and_then(|versions| {
            versions
                .iter()
                .find(|v| v.get("id").and_then(Value::as_str) == Some(version))
        })
        .and_then(|v| v.get("url"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            SoundpackError::fetch(manifest_url, format!("version {} is not listed", version))
        })?;

    let details = source.fetch_json(version_url).await?;
    let index_url = details
        .pointer("/assetIndex/url")
        .and_then(Value::as_str)
        .ok_or_else(|| SoundpackError::malformed("version details", "no assetIndex.url"))?;

    let index = AssetIndex::from_value(source.fetch_json(index_url).await?, &config.resources_url)?;
    debug!("Asset index for {}: {} objects", version, index.len());
    Ok((version.to_string(), index))
}

/// Fetch the platform's own sounds table through the asset index, minus
/// the excluded prefixes.
pub async fn load_platform_sounds<S: TableSource>(
    source: &S,
    config: &SessionConfig,
    index: &AssetIndex,
) -> SoundDefinitionSet {
    let path = format!("{}/sounds.json", config.platform_namespace);
    let Some(hash) = index.hash_for(&path) else {
        warn!("Asset index has no {}", path);
        return SoundDefinitionSet::new();
    };

    let set = match source.fetch_json(&index.uri_for(hash)).await {
        Ok(document) => SoundDefinitionSet::from_value(document),
        Err(e) => Err(e),
    };
    match set {
        Ok(set) => {
            let prefixes: Vec<&str> = config
                .excluded_sound_prefixes
                .iter()
                .map(String::as_str)
                .collect();
            set.without_prefixes(&prefixes)
        }
        Err(e) => {
            warn!("Platform sounds unavailable: {}", e);
            SoundDefinitionSet::new()
        }
    }
}

/// Fetch the mod's sounds table: the auto-generated table for `version`
/// with the published table of `revision` merged over it.
pub async fn load_mod_sounds<S: TableSource>(
    source: &S,
    config: &SessionConfig,
    version: &str,
    revision: &str,
) -> SoundDefinitionSet {
    let generated = match config.generated_sounds_url_for(version) {
        Some(url) => fetch_sounds(source, &url).await.unwrap_or_else(|e| {
            warn!("Generated mod sounds for {} unavailable: {}", version, e);
            SoundDefinitionSet::new()
        }),
        None => SoundDefinitionSet::new(),
    };

    let published = fetch_sounds(source, &config.mod_sounds_url_for(revision))
        .await
        .unwrap_or_else(|e| {
            warn!("Mod sounds for {} unavailable: {}", revision, e);
            SoundDefinitionSet::new()
        });

    merge(&generated, &[&published])
}

/// Fetch a sounds table, following a contents-API `download_url` if the
/// response is a file descriptor rather than the table.
async fn fetch_sounds<S: TableSource>(source: &S, url: &str) -> Result<SoundDefinitionSet> {
    let document = source.fetch_json(url).await?;
    let document = match document.get("download_url").and_then(Value::as_str) {
        Some(download_url) => source.fetch_json(download_url).await?,
        None => document,
    };
    SoundDefinitionSet::from_value(document)
}

/// Load every table a session needs for one platform version and mod
/// revision.
///
/// `cached_index` is reused instead of fetching the asset index again; the
/// platform sounds table is always re-read from it. `user` is the pack's
/// own table, layered over the mod's.
pub async fn build_tables<S: TableSource>(
    source: &S,
    config: &SessionConfig,
    version: &str,
    revision: &str,
    cached_index: Option<AssetIndex>,
    user: Option<&SoundDefinitionSet>,
) -> Result<SessionTables> {
    let (version, mut index) = match cached_index {
        Some(index) => (version.to_string(), index),
        None => load_asset_index(source, config, version).await?,
    };
    let version = version.as_str();

    let platform = load_platform_sounds(source, config, &index).await;
    index.retain_sounds(&config.platform_namespace);
    let mod_sounds = load_mod_sounds(source, config, version, revision).await;

    let mut layers = vec![
        DefinitionLayer::new(LayerSource::Platform, &config.platform_namespace, version, platform),
        DefinitionLayer::new(LayerSource::Mod, &config.mod_namespace, revision, mod_sounds),
    ];
    if let Some(user) = user {
        layers.push(DefinitionLayer::new(
            LayerSource::User,
            &config.mod_namespace,
            revision,
            user.clone(),
        ));
    }

    let tables = SessionTables::assemble(version, revision, layers, index);
    info!(
        "Tables for {} / {}: {} namespaces, {} platform sounds",
        version,
        revision,
        tables.definitions.len(),
        tables.asset_index.len()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::StaticSource;
    use serde_json::json;

    fn config() -> SessionConfig {
        SessionConfig {
            version_manifest_url: "https://meta.test/manifest.json".into(),
            resources_url: "https://res.test".into(),
            pack_formats_url: "https://gist.test/formats".into(),
            mod_sounds_url: "https://mod.test/sounds.json?ref={revision}".into(),
            mod_tags_url: "https://mod.test/tags".into(),
            generated_sounds_url: Some("https://mod.test/generated/{version}.json".into()),
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_pack_formats_through_listing() {
        let source = StaticSource::new()
            .with(
                "https://gist.test/formats",
                json!({ "files": { "minecraft_res_pack_format.json": { "raw_url": "https://gist.test/raw" } } }),
            )
            .with("https://gist.test/raw", json!({ "1.19.4": 13, "1.20": 15 }));

        let table = load_pack_formats(&source, &config()).await;
        assert_eq!(table.latest_version(), Some("1.20"));
        assert_eq!(table.format_for("1.19.4").unwrap(), 13);
    }

    #[tokio::test]
    async fn test_pack_formats_degrade_to_empty() {
        let source = StaticSource::new().with("https://gist.test/formats", json!({ "1.20": "fifteen" }));
        assert!(load_pack_formats(&source, &config()).await.is_empty());

        let missing = StaticSource::new();
        assert!(load_pack_formats(&missing, &config()).await.is_empty());
    }

    #[tokio::test]
    async fn test_asset_index_latest_release() {
        let source = StaticSource::new()
            .with(
                "https://meta.test/manifest.json",
                json!({
                    "latest": { "release": "1.20" },
                    "versions": [
                        { "id": "1.20", "url": "https://meta.test/1.20.json" },
                        { "id": "1.19.4", "url": "https://meta.test/1.19.4.json" }
                    ]
                }),
            )
            .with(
                "https://meta.test/1.20.json",
                json!({ "assetIndex": { "url": "https://meta.test/index/5.json" } }),
            )
            .with(
                "https://meta.test/index/5.json",
                json!({ "objects": { "minecraft/sounds/dig/stone1.ogg": { "hash": "ab12", "size": 3 } } }),
            );

        let (version, index) = load_asset_index(&source, &config(), LATEST).await.unwrap();
        assert_eq!(version, "1.20");
        assert_eq!(index.hash_for("minecraft/sounds/dig/stone1.ogg"), Some("ab12"));
        assert_eq!(index.uri_for("ab12"), "https://res.test/ab/ab12");

        let err = load_asset_index(&source, &config(), "1.8").await.unwrap_err();
        assert_eq!(err.error_code(), "FETCH_ERROR");

        let tables = build_tables(&source, &config(), LATEST, "dev", None, None)
            .await
            .unwrap();
        assert_eq!(tables.platform_version, "1.20");
        assert!(tables.layers.iter().all(|layer| layer.version != LATEST));
        assert_eq!(latest_release(&source, &config()).await.unwrap(), "1.20");
    }

    #[tokio::test]
    async fn test_platform_sounds_drop_music() {
        let mut index = AssetIndex::new("https://res.test");
        index.insert("minecraft/sounds.json", "cd34");
        let source = StaticSource::new().with(
            "https://res.test/cd/cd34",
            json!({
                "ambient.cave": { "sounds": ["ambient/cave/cave1"] },
                "music.game": { "sounds": ["music/game/calm1"] },
                "music_disc.cat": { "sounds": ["records/cat"] }
            }),
        );

        let set = load_platform_sounds(&source, &config(), &index).await;
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["ambient.cave"]);
    }

    #[tokio::test]
    async fn test_mod_sounds_follow_download_url() {
        let source = StaticSource::new()
            .with(
                "https://mod.test/generated/1.20.json",
                json!({ "gui.click": { "sounds": ["gui/click_generated"] } }),
            )
            .with(
                "https://mod.test/sounds.json?ref=dev",
                json!({ "name": "sounds.json", "download_url": "https://raw.test/sounds.json" }),
            )
            .with(
                "https://raw.test/sounds.json",
                json!({ "gui.click": { "sounds": ["gui/click_published"] } }),
            );

        let set = load_mod_sounds(&source, &config(), "1.20", "dev").await;
        let sounds = &set.get("gui.click").unwrap().sounds;
        assert_eq!(sounds.len(), 2);
        assert_eq!(sounds[1].name(), "gui/click_published");
    }

    #[tokio::test]
    async fn test_revisions_degrade_to_empty() {
        let source = StaticSource::new().with("https://mod.test/tags", json!({ "message": "rate limited" }));
        assert!(load_revisions(&source, &config()).await.is_empty());
    }
}
