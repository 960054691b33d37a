//! Editing session
//!
//! A session owns the loaded pack, the pack format table and the derived
//! tables for the pack's target platform version. Tables are published as
//! a single `Arc` snapshot: a retarget builds the replacement completely
//! and swaps it in one step, and a resolution that already took a snapshot
//! finishes against it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use super::playback::{AudioSink, LogSink, PlaybackRequest, PlaybackSource, PreviewPlayer};
use super::tables::SessionTables;
use crate::assets::{archive_path, AssetLocation, AssetLocator, ResourcePack};
use crate::config::SessionConfig;
use crate::error::{Result, SoundpackError};
use crate::remote::{self, TableSource};
use crate::resolve::{Resolution, SoundRef, SoundResolver};
use crate::sounds::{EntryPicker, SoundDefinitionSet};
use crate::version::{PackFormatTable, RevisionCatalog, VersionRequest, LATEST};

/// Result of a preview request
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Playing(PlaybackRequest),
    /// The sound cannot be previewed; the session is unaffected
    Unavailable { code: &'static str, reason: String },
}

impl PreviewOutcome {
    pub fn is_playing(&self) -> bool {
        matches!(self, PreviewOutcome::Playing(_))
    }

    fn unavailable(error: &SoundpackError) -> Self {
        PreviewOutcome::Unavailable {
            code: error.error_code(),
            reason: error.to_string(),
        }
    }
}

/// Published state: derived tables plus the pack they were built for
#[derive(Debug, Clone, Default)]
struct SessionState {
    tables: Arc<SessionTables>,
    pack: Option<Arc<ResourcePack>>,
}

pub struct Session {
    id: Uuid,
    opened_at: DateTime<Utc>,
    config: SessionConfig,
    pack_formats: PackFormatTable,
    revisions: RevisionCatalog,
    state: RwLock<Arc<SessionState>>,
    rng: Mutex<StdRng>,
    player: Mutex<PreviewPlayer<Box<dyn AudioSink>>>,
}

impl Session {
    /// Open a session over already loaded tables
    pub fn open(
        config: SessionConfig,
        pack_formats: PackFormatTable,
        pack: Option<ResourcePack>,
        tables: SessionTables,
    ) -> Self {
        let rng = match config.selection_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let session = Self {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            config,
            pack_formats,
            revisions: RevisionCatalog::default(),
            state: RwLock::new(Arc::new(SessionState {
                tables: Arc::new(tables),
                pack: pack.map(Arc::new),
            })),
            rng: Mutex::new(rng),
            player: Mutex::new(PreviewPlayer::new(Box::new(LogSink))),
        };
        info!(
            "Opened session {} for {} / {}",
            session.id,
            session.platform_version(),
            session.revision()
        );
        session
    }

    /// Load every remote table and open a session for `pack`.
    ///
    /// The platform version comes from the pack (or the newest known version
    /// when there is no pack) and is pinned for the session's lifetime. With
    /// no pack format table either, the manifest's latest release is pinned.
    /// Without an explicit `revision` the newest tag for that version is used.
    pub async fn connect<S: TableSource>(
        source: &S,
        config: SessionConfig,
        pack: Option<ResourcePack>,
        revision: Option<&str>,
    ) -> Result<Self> {
        let pack_formats = remote::load_pack_formats(source, &config).await;
        let revisions = remote::load_revisions(source, &config).await;

        let platform_version = match pack
            .as_ref()
            .and_then(|p| p.platform_version(&pack_formats))
            .or_else(|| pack_formats.pin(&VersionRequest::Latest))
        {
            Some(version) if version != LATEST => version,
            _ => remote::latest_release(source, &config).await?,
        };
        let revision = revision
            .map(str::to_string)
            .unwrap_or_else(|| revisions.latest_tag_for(&platform_version));

        let tables = remote::build_tables(
            source,
            &config,
            &platform_version,
            &revision,
            None,
            pack.as_ref().map(|p| &p.sounds),
        )
        .await?;

        let mut session = Self::open(config, pack_formats, pack, tables);
        session.revisions = revisions;
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pack_formats(&self) -> &PackFormatTable {
        &self.pack_formats
    }

    pub fn revisions(&self) -> &RevisionCatalog {
        &self.revisions
    }

    /// Route previews to `sink`, stopping the current one
    pub fn set_sink(&self, sink: Box<dyn AudioSink>) {
        let mut player = self.player.lock();
        player.stop();
        *player = PreviewPlayer::new(sink);
    }

    /// Current tables
    pub fn snapshot(&self) -> Arc<SessionTables> {
        Arc::clone(&self.state.read().tables)
    }

    /// Current pack
    pub fn pack(&self) -> Option<Arc<ResourcePack>> {
        self.state.read().pack.clone()
    }

    pub fn platform_version(&self) -> String {
        self.snapshot().platform_version.clone()
    }

    pub fn revision(&self) -> String {
        self.snapshot().revision.clone()
    }

    /// Replace the derived tables in one step
    pub fn publish(&self, tables: SessionTables) {
        let mut state = self.state.write();
        debug!(
            "Publishing tables for {} / {}",
            tables.platform_version, tables.revision
        );
        *state = Arc::new(SessionState {
            tables: Arc::new(tables),
            pack: state.pack.clone(),
        });
    }

    /// Replace the pack's own sounds table and rebuild the merged tables
    /// from the layers already loaded.
    pub fn update_pack_sounds(&self, sounds: SoundDefinitionSet) -> Result<()> {
        let mut state = self.state.write();
        let mut pack = state
            .pack
            .as_deref()
            .cloned()
            .ok_or(SoundpackError::NoPackageLoaded)?;
        let tables = state
            .tables
            .with_user_layer(&self.config.mod_namespace, &sounds);
        pack.sounds = sounds;

        *state = Arc::new(SessionState {
            tables: Arc::new(tables),
            pack: Some(Arc::new(pack)),
        });
        Ok(())
    }

    /// Switch to another mod revision.
    ///
    /// The platform version follows the revision when the catalog knows it,
    /// and the pack's `pack_format` is updated to match. All tables are
    /// rebuilt before anything is published; on error the session keeps
    /// its current state. The asset index is reused when the platform
    /// version does not change. Pack sounds edited while the tables were
    /// loading are carried into the published state.
    pub async fn retarget<S: TableSource>(&self, source: &S, revision: &str) -> Result<()> {
        let current = Arc::clone(&self.state.read());

        let platform_version = self
            .revisions
            .platform_version_for(revision)
            .map(str::to_string)
            .unwrap_or_else(|| current.tables.platform_version.clone());

        let mut pack = match current.pack.as_deref() {
            Some(pack) => {
                let mut pack = pack.clone();
                pack.set_target_version(&platform_version);
                if let Err(e) = pack.set_pack_format_for(&platform_version, &self.pack_formats) {
                    warn!("Keeping pack_format {}: {}", pack.pack_format(), e);
                }
                Some(pack)
            }
            None => None,
        };

        let cached_index = (platform_version == current.tables.platform_version)
            .then(|| current.tables.asset_index.clone());
        let mut tables = remote::build_tables(
            source,
            &self.config,
            &platform_version,
            revision,
            cached_index,
            pack.as_ref().map(|p| &p.sounds),
        )
        .await?;

        let mut state = self.state.write();
        if !Arc::ptr_eq(&current, &*state) {
            if let (Some(pack), Some(latest)) = (pack.as_mut(), state.pack.as_deref()) {
                debug!("Pack sounds changed during retarget; applying the latest edit");
                pack.sounds = latest.sounds.clone();
                tables = tables.with_user_layer(&self.config.mod_namespace, &pack.sounds);
            }
        }
        *state = Arc::new(SessionState {
            tables: Arc::new(tables),
            pack: pack.map(Arc::new),
        });
        drop(state);
        info!("Session {} retargeted to {} / {}", self.id, platform_version, revision);
        Ok(())
    }

    /// Resolve a reference against the current tables
    pub fn resolve(&self, reference: &str, volume: f32, pitch: f32, is_event: bool) -> Result<Resolution> {
        let tables = self.snapshot();
        let mut rng = self.rng.lock();
        let mut resolver = SoundResolver::new(
            &tables.definitions,
            &self.config.platform_namespace,
            EntryPicker::new(self.config.selection_policy),
            &mut *rng,
        );
        resolver.resolve(reference, volume, pitch, is_event)
    }

    /// Find where a resolved sound's audio lives
    pub async fn locate(&self, resolution: &Resolution) -> Result<AssetLocation> {
        let state = Arc::clone(&self.state.read());
        let locator = AssetLocator::new(
            &state.tables.asset_index,
            state.pack.as_deref().map(ResourcePack::container),
        );
        locator.locate(&resolution.path).await
    }

    /// Resolve, locate and start previewing a sound.
    ///
    /// Sounds that cannot be previewed (unknown or empty entries, missing
    /// files, no pack) come back as [`PreviewOutcome::Unavailable`]. Other
    /// errors, such as a cyclic definition, are returned as `Err`.
    pub async fn play(
        &self,
        reference: &str,
        volume: f32,
        pitch: f32,
        is_event: bool,
    ) -> Result<PreviewOutcome> {
        let resolution = match self.resolve(reference, volume, pitch, is_event) {
            Ok(resolution) => resolution,
            Err(e) => return soft_failure(reference, e),
        };

        let source = match self.locate(&resolution).await {
            Ok(AssetLocation::Remote(asset)) => PlaybackSource::Remote { uri: asset.uri },
            Ok(AssetLocation::Archive(asset)) => PlaybackSource::Archive {
                path: asset.path,
                bytes: asset.bytes,
            },
            Ok(AssetLocation::NotFound { path }) => {
                return soft_failure(reference, SoundpackError::AssetNotFound { path })
            }
            Err(e) => return soft_failure(reference, e),
        };

        let request = self
            .player
            .lock()
            .play(source, resolution.volume, resolution.pitch)?;
        Ok(PreviewOutcome::Playing(request))
    }

    pub fn stop_preview(&self) {
        self.player.lock().stop();
    }

    /// Whether `name` refers to an event rather than a sound file.
    ///
    /// Platform names are files when the asset index has them; other
    /// namespaces are files when the pack bundles them.
    pub fn is_event_name(&self, name: &str) -> bool {
        let Ok(reference) = SoundRef::parse(name, &self.config.platform_namespace) else {
            return false;
        };
        let state = self.state.read();
        let path = reference.sound_path();

        if reference.namespace == self.config.platform_namespace {
            !state.tables.asset_index.contains(&path)
        } else {
            match &state.pack {
                Some(pack) => !pack.container().contains(&archive_path(&path)),
                None => true,
            }
        }
    }

    /// Every playable name, sorted case-insensitively
    pub fn sound_names(&self) -> Vec<String> {
        self.snapshot().sound_names(&self.config.platform_namespace)
    }

    /// Entry names defined for the mod namespace
    pub fn mod_entry_names(&self) -> Vec<String> {
        self.snapshot().entry_names(&self.config.mod_namespace)
    }

    /// Export the current pack as zip bytes
    pub fn export_pack(&self) -> Result<Vec<u8>> {
        let mut pack = self
            .pack()
            .as_deref()
            .cloned()
            .ok_or(SoundpackError::NoPackageLoaded)?;
        for name in pack.sounds.empty_entries() {
            warn!("Exporting empty sound entry {}", name);
        }
        pack.export()
    }
}

fn soft_failure(reference: &str, error: SoundpackError) -> Result<PreviewOutcome> {
    if error.is_recoverable() {
        warn!("Cannot preview {}: {}", reference, error);
        Ok(PreviewOutcome::unavailable(&error))
    } else {
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetIndex;
    use crate::sounds::{DefinitionLayer, LayerSource, SoundDefinition, SoundEntry};
    use crate::version::DEFAULT_REVISION;

    fn session(pack: Option<ResourcePack>) -> Session {
        let mut index = AssetIndex::new("https://res.test");
        index.insert("minecraft/sounds/random/click.ogg", "cc33");
        let platform: SoundDefinitionSet = vec![(
            "ui.button.click",
            SoundDefinition::new(vec![SoundEntry::file("random/click")]),
        )]
        .into_iter()
        .collect();
        let tables = SessionTables::assemble(
            "1.20",
            DEFAULT_REVISION,
            vec![DefinitionLayer::new(LayerSource::Platform, "minecraft", "1.20", platform)],
            index,
        );
        let config = SessionConfig {
            selection_seed: Some(3),
            ..SessionConfig::default()
        };
        Session::open(config, PackFormatTable::empty(), pack, tables)
    }

    #[tokio::test]
    async fn test_play_remote() {
        let session = session(None);
        let outcome = session.play("ui.button.click", 1.0, 1.0, true).await.unwrap();

        match outcome {
            PreviewOutcome::Playing(request) => {
                assert_eq!(
                    request.source,
                    PlaybackSource::Remote {
                        uri: "https://res.test/cc/cc33".into()
                    }
                );
            }
            other => panic!("expected playback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_entry_is_soft() {
        let session = session(None);
        let outcome = session.play("ui.missing", 1.0, 1.0, true).await.unwrap();
        assert!(matches!(
            outcome,
            PreviewOutcome::Unavailable { code: "UNKNOWN_SOUND_ENTRY", .. }
        ));
    }

    #[tokio::test]
    async fn test_mod_file_without_pack_is_soft() {
        let session = session(None);
        let outcome = session
            .play("extrasounds:gui/click", 1.0, 1.0, false)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            PreviewOutcome::Unavailable { code: "NO_PACKAGE_LOADED", .. }
        ));
    }

    #[test]
    fn test_is_event_name() {
        let mut pack = ResourcePack::new("extrasounds");
        pack.container_mut()
            .insert("assets/extrasounds/sounds/gui/click.ogg", vec![1, 2, 3]);
        let session = session(Some(pack));

        assert!(!session.is_event_name("random/click"));
        assert!(session.is_event_name("ui.button.click"));
        assert!(!session.is_event_name("extrasounds:gui/click"));
        assert!(session.is_event_name("extrasounds:gui.click"));
    }

    #[tokio::test]
    async fn test_blank_entry_is_soft() {
        let session = session(None);
        let mut tables = (*session.snapshot()).clone();
        tables.layers.push(DefinitionLayer::new(
            LayerSource::Platform,
            "minecraft",
            "1.20",
            vec![("blank", SoundDefinition::new(vec![SoundEntry::file("")]))]
                .into_iter()
                .collect(),
        ));
        let tables = SessionTables::assemble("1.20", DEFAULT_REVISION, tables.layers, tables.asset_index);
        session.publish(tables);

        let outcome = session.play("blank", 1.0, 1.0, true).await.unwrap();
        assert!(matches!(
            outcome,
            PreviewOutcome::Unavailable { code: "EMPTY_SOUND_ENTRY", .. }
        ));
        assert!(session.play("ui.button.click", 1.0, 1.0, true).await.unwrap().is_playing());
    }

    #[test]
    fn test_update_pack_sounds_requires_pack() {
        let session = session(None);
        let err = session.update_pack_sounds(SoundDefinitionSet::new()).unwrap_err();
        assert!(matches!(err, SoundpackError::NoPackageLoaded));
    }
}
