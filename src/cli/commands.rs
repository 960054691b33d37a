//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;

use crate::assets::{AssetIndex, ResourceContainer, ResourcePack};
use crate::config::SessionConfig;
use crate::error::{Result, SoundpackError};
use crate::session::{PreviewOutcome, Session, SessionTables};
use crate::sounds::{merge as merge_sets, DefinitionLayer, LayerSource, SoundDefinitionSet};
use crate::version::{sort_versions, PackFormatTable, VersionRequest, DEFAULT_REVISION};

/// Inputs of the `resolve` command
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub reference: String,
    pub platform: Option<PathBuf>,
    pub mod_sounds: Option<PathBuf>,
    pub index: Option<PathBuf>,
    pub pack: Option<PathBuf>,
    pub is_event: bool,
    pub volume: f32,
    pub pitch: f32,
    pub seed: Option<u64>,
}

/// Print versions in order.
pub fn versions(versions: &[String], descending: bool) -> Result<()> {
    for version in sort_versions(versions, descending) {
        println!("{}", version);
    }
    Ok(())
}

/// Print the pack format of a platform version.
pub async fn pack_format(config: &SessionConfig, version: &str, table: Option<&Path>) -> Result<()> {
    let table = pack_format_table(config, table).await?;
    let version = table
        .pin(&VersionRequest::parse(version))
        .ok_or_else(|| SoundpackError::NoCompatibleFormat {
            version: version.to_string(),
        })?;
    let format = table.format_for(&version)?;

    if table.is_exact_format(format, &version) {
        println!("{} -> pack_format {}", version, format);
    } else {
        println!("{} -> pack_format {} (nearest lower version)", version, format);
    }
    Ok(())
}

/// Merge sounds tables and print or write the result.
pub fn merge(base: &Path, overlays: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let base_set = read_sounds(base)?;
    let overlay_sets = overlays
        .iter()
        .map(|p| read_sounds(p))
        .collect::<Result<Vec<_>>>()?;
    let overlay_refs: Vec<&SoundDefinitionSet> = overlay_sets.iter().collect();

    let merged = merge_sets(&base_set, &overlay_refs);
    let json = merged.to_json_pretty()?;
    info!("Merged {} tables into {} entries", overlays.len() + 1, merged.len());

    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("Wrote {} entries to {}", merged.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Resolve a reference against local tables and preview it.
pub async fn resolve(mut config: SessionConfig, options: ResolveOptions) -> Result<()> {
    let platform = options
        .platform
        .as_deref()
        .map(read_sounds)
        .transpose()?
        .unwrap_or_default();
    let mod_sounds = options
        .mod_sounds
        .as_deref()
        .map(read_sounds)
        .transpose()?
        .unwrap_or_default();
    let index = match options.index.as_deref() {
        Some(path) => AssetIndex::from_value(read_json(path)?, &config.resources_url)?,
        None => AssetIndex::new(&config.resources_url),
    };
    let pack = match options.pack.as_deref() {
        Some(path) => Some(ResourcePack::load(&fs::read(path)?, &config.mod_namespace)?),
        None => None,
    };

    let mut layers = vec![
        DefinitionLayer::new(LayerSource::Platform, &config.platform_namespace, "local", platform),
        DefinitionLayer::new(LayerSource::Mod, &config.mod_namespace, DEFAULT_REVISION, mod_sounds),
    ];
    if let Some(pack) = &pack {
        layers.push(DefinitionLayer::new(
            LayerSource::User,
            &config.mod_namespace,
            DEFAULT_REVISION,
            pack.sounds.clone(),
        ));
    }
    let tables = SessionTables::assemble("local", DEFAULT_REVISION, layers, index);

    config.selection_seed = options.seed.or(config.selection_seed);
    let session = Session::open(config, PackFormatTable::empty(), pack, tables);

    let resolution =
        session.resolve(&options.reference, options.volume, options.pitch, options.is_event)?;
    println!("Path:         {}", resolution.path);
    println!("Volume:       {:.3}", resolution.volume);
    println!("Pitch:        {:.3}", resolution.pitch);
    println!("Lookups:      {}", resolution.dereferences);

    match session
        .play(&options.reference, options.volume, options.pitch, options.is_event)
        .await?
    {
        PreviewOutcome::Playing(request) => println!("Source:       {}", request.source),
        PreviewOutcome::Unavailable { code, reason } => {
            println!("Unavailable:  {} ({})", reason, code)
        }
    }
    Ok(())
}

/// Print a pack's metadata and sound entries.
pub async fn inspect_pack(config: &SessionConfig, path: &Path, table: Option<&Path>) -> Result<()> {
    let pack = ResourcePack::load(&fs::read(path)?, &config.mod_namespace)?;
    let table = pack_format_table(config, table).await.unwrap_or_else(|e| {
        warn!("Pack format table unavailable: {}", e);
        PackFormatTable::empty()
    });

    println!("Pack:         {}", path.display());
    println!("Description:  {}", pack.meta.pack.description);
    println!("Pack format:  {}", pack.pack_format());
    match pack.platform_version(&table) {
        Some(version) => {
            let exact = if pack.is_exact_format(&version, &table) {
                "exact"
            } else {
                "not exact"
            };
            println!("Targets:      {} ({})", version, exact);
        }
        None => println!("Targets:      unknown"),
    }
    println!("Files:        {}", pack.container().len());
    println!("Checksum:     {}", pack.container().checksum());
    println!("Entries:      {}", pack.sounds.len());

    for (name, definition) in pack.sounds.iter() {
        let marker = if definition.replace { " (replace)" } else { "" };
        println!("  {}{}: {} sounds", name, marker, definition.sounds.len());
    }
    for name in pack.sounds.empty_entries() {
        println!("  warning: {} has no sounds", name);
    }
    Ok(())
}

/// Build a pack zip from a directory.
pub async fn build_pack(
    config: &SessionConfig,
    dir: &Path,
    output: Option<&Path>,
    target: Option<&str>,
    table: Option<&Path>,
) -> Result<()> {
    info!("Building pack from: {}", dir.display());

    let container = ResourceContainer::from_dir(dir)?;
    let mut pack = ResourcePack::from_container(container, &config.mod_namespace)?;
    let table = pack_format_table(config, table).await.unwrap_or_else(|e| {
        warn!("Pack format table unavailable: {}", e);
        PackFormatTable::empty()
    });

    if let Some(target) = target {
        let version = table
            .pin(&VersionRequest::parse(target))
            .unwrap_or_else(|| target.to_string());
        pack.set_target_version(&version);
        match pack.set_pack_format_for(&version, &table) {
            Ok(format) => info!("pack_format {} for {}", format, version),
            Err(e) => warn!("Keeping pack_format {}: {}", pack.pack_format(), e),
        }
    }

    let bytes = pack.export()?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(pack.export_file_name(&table)),
    };
    fs::write(&output, &bytes)?;

    println!("Pack written: {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read_sounds(path: &Path) -> Result<SoundDefinitionSet> {
    SoundDefinitionSet::from_json_str(&fs::read_to_string(path)?)
}

async fn pack_format_table(config: &SessionConfig, path: Option<&Path>) -> Result<PackFormatTable> {
    match path {
        Some(path) => PackFormatTable::from_json_str(&fs::read_to_string(path)?),
        None => remote_pack_formats(config).await,
    }
}

#[cfg(feature = "remote")]
async fn remote_pack_formats(config: &SessionConfig) -> Result<PackFormatTable> {
    let source = crate::remote::HttpSource::new(config)?;
    Ok(crate::remote::load_pack_formats(&source, config).await)
}

#[cfg(not(feature = "remote"))]
async fn remote_pack_formats(_config: &SessionConfig) -> Result<PackFormatTable> {
    Err(SoundpackError::Config {
        reason: "no pack format table given and the `remote` feature is disabled".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_merge_writes_output() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("base.json");
        let overlay = dir.path().join("overlay.json");
        let output = dir.path().join("merged.json");
        fs::write(&base, r#"{ "a": { "sounds": ["x"] } }"#).unwrap();
        fs::write(&overlay, r#"{ "a": { "sounds": ["y"] }, "b": { "sounds": ["z"] } }"#).unwrap();

        merge(&base, &[overlay], Some(&output)).unwrap();

        let merged = read_sounds(&output).unwrap();
        assert_eq!(merged.get("a").unwrap().sounds.len(), 2);
        assert!(merged.contains("b"));
    }

    #[tokio::test]
    async fn test_build_pack_sets_format() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("pack");
        fs::create_dir_all(root.join("assets/extrasounds")).unwrap();
        fs::write(
            root.join("assets/extrasounds/sounds.json"),
            r#"{ "gui.click": { "sounds": ["gui/click"] } }"#,
        )
        .unwrap();
        let table = dir.path().join("formats.json");
        fs::write(&table, r#"{ "1.19.4": 13, "1.20": 15 }"#).unwrap();
        let output = dir.path().join("out.zip");

        build_pack(
            &SessionConfig::default(),
            &root,
            Some(&output),
            Some("1.20.1"),
            Some(&table),
        )
        .await
        .unwrap();

        let pack = ResourcePack::load(&fs::read(&output).unwrap(), "extrasounds").unwrap();
        assert_eq!(pack.pack_format(), 15);
        assert_eq!(pack.meta.pack.target_version.as_deref(), Some("1.20.1"));
        assert!(pack.sounds.contains("gui.click"));
    }
}
