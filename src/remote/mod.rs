//! Remote Module
//!
//! Table sources, the loaders that turn remote documents into session
//! tables, and the admission rules of the forwarding proxy.

mod catalog;
#[cfg(feature = "remote")]
mod http;
mod proxy;
mod source;

pub use catalog::{
    build_tables, latest_release, load_asset_index, load_mod_sounds, load_pack_formats,
    load_platform_sounds, load_revisions,
};
#[cfg(feature = "remote")]
pub use http::HttpSource;
pub use proxy::{ProxyGuard, ProxyRejection};
pub use source::{StaticSource, TableSource};
