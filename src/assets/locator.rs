//! Locating resolved sound paths
//!
//! A resolved path such as `minecraft/sounds/block/stone/hit1.ogg` is
//! either a platform asset (found in the hash index and downloaded by
//! hash) or a file bundled under `assets/` in the loaded pack.

use log::debug;

use super::container::ResourceContainer;
use super::index::AssetIndex;
use crate::error::{Result, SoundpackError};

/// Platform asset addressed by content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAsset {
    pub path: String,
    pub hash: String,
    pub uri: String,
}

/// Audio bundled in the loaded pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveAsset {
    /// Path inside the archive, including the `assets/` prefix
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    Remote(RemoteAsset),
    Archive(ArchiveAsset),
    /// Neither the index nor the pack has the file. Expected for sounds
    /// that are referenced but not bundled.
    NotFound { path: String },
}

impl AssetLocation {
    pub fn is_found(&self) -> bool {
        !matches!(self, AssetLocation::NotFound { .. })
    }
}

/// Archive path of a resolved sound path
pub fn archive_path(path: &str) -> String {
    format!("assets/{}", path)
}

/// Looks up resolved paths in the platform index, then the pack
#[derive(Debug, Clone, Copy)]
pub struct AssetLocator<'a> {
    index: &'a AssetIndex,
    container: Option<&'a ResourceContainer>,
}

impl<'a> AssetLocator<'a> {
    pub fn new(index: &'a AssetIndex, container: Option<&'a ResourceContainer>) -> Self {
        Self { index, container }
    }

    pub fn uri_for(&self, hash: &str) -> String {
        self.index.uri_for(hash)
    }

    /// Locate a resolved path.
    ///
    /// # Errors
    /// `NoPackageLoaded` when the path is not a platform asset and there is
    /// no pack to look in.
    pub async fn locate(&self, path: &str) -> Result<AssetLocation> {
        if let Some(remote) = self.locate_remote(path).await {
            return Ok(AssetLocation::Remote(remote));
        }
        self.locate_in_archive(path).await
    }

    /// Platform branch: hash index lookup
    pub async fn locate_remote(&self, path: &str) -> Option<RemoteAsset> {
        let hash = self.index.hash_for(path)?;
        let uri = self.uri_for(hash);
        debug!("Located {} remotely at {}", path, uri);
        Some(RemoteAsset {
            path: path.to_string(),
            hash: hash.to_string(),
            uri,
        })
    }

    /// Pack branch: archive lookup under `assets/`
    pub async fn locate_in_archive(&self, path: &str) -> Result<AssetLocation> {
        let container = self.container.ok_or(SoundpackError::NoPackageLoaded)?;
        let archive_path = archive_path(path);

        match container.read(&archive_path) {
            Some(bytes) => {
                debug!("Located {} in pack ({} bytes)", archive_path, bytes.len());
                Ok(AssetLocation::Archive(ArchiveAsset {
                    path: archive_path,
                    bytes: bytes.to_vec(),
                }))
            }
            None => Ok(AssetLocation::NotFound {
                path: path.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> AssetIndex {
        let mut index = AssetIndex::new("https://resources.example.net");
        index.insert("minecraft/sounds/block/stone/hit1.ogg", "abcdef0123");
        index
    }

    #[tokio::test]
    async fn test_remote_branch() {
        let index = index();
        let locator = AssetLocator::new(&index, None);

        let location = locator
            .locate("minecraft/sounds/block/stone/hit1.ogg")
            .await
            .unwrap();
        assert_eq!(
            location,
            AssetLocation::Remote(RemoteAsset {
                path: "minecraft/sounds/block/stone/hit1.ogg".to_string(),
                hash: "abcdef0123".to_string(),
                uri: "https://resources.example.net/ab/abcdef0123".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_archive_branch() {
        let index = index();
        let mut container = ResourceContainer::new();
        container.insert("assets/custom/sounds/drip.ogg", vec![4, 2]);
        let locator = AssetLocator::new(&index, Some(&container));

        match locator.locate("custom/sounds/drip.ogg").await.unwrap() {
            AssetLocation::Archive(asset) => {
                assert_eq!(asset.path, "assets/custom/sounds/drip.ogg");
                assert_eq!(asset.bytes, vec![4, 2]);
            }
            other => panic!("expected archive asset, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_is_not_an_error() {
        let index = index();
        let container = ResourceContainer::new();
        let locator = AssetLocator::new(&index, Some(&container));

        let location = locator.locate("custom/sounds/missing.ogg").await.unwrap();
        assert!(!location.is_found());
    }

    #[tokio::test]
    async fn test_no_package_loaded() {
        let index = index();
        let locator = AssetLocator::new(&index, None);

        let err = locator.locate("custom/sounds/drip.ogg").await.unwrap_err();
        assert!(matches!(err, SoundpackError::NoPackageLoaded));
    }
}
