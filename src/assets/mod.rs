//! Assets Module
//!
//! Platform asset index, in-memory pack archives and the locator that
//! decides where a resolved sound comes from.

mod container;
mod index;
mod locator;
mod pack;

pub use container::ResourceContainer;
pub use index::{AssetIndex, AssetObject};
pub use locator::{archive_path, ArchiveAsset, AssetLocation, AssetLocator, RemoteAsset};
pub use pack::{sounds_file, PackMeta, PackSection, ResourcePack, META_FILE};
