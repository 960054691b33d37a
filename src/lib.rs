//! Soundpack - sound definition resolution and resource pack versioning
//!
//! Soundpack backs a resource-pack editor for a sound mod. It provides:
//! 1. Version ordering and the platform version → pack format table
//! 2. Layered sound definition tables (platform, mod, user) and their merge
//! 3. Resolution of event aliases down to a sound file, with composed
//!    volume and pitch
//! 4. Location of resolved sounds in the platform asset index or the pack
//!
//! # Architecture
//!
//! An editing [`session::Session`] owns the loaded pack and publishes the
//! derived tables as one immutable snapshot. Remote tables are fetched
//! through a [`remote::TableSource`]; the HTTP source is behind the
//! `remote` feature.

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod remote;
pub mod resolve;
pub mod session;
pub mod sounds;
pub mod version;

pub use error::{Result, SoundpackError};
