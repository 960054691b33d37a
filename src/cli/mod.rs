//! CLI Module
//!
//! Command-line interface for inspecting sound tables and resource packs.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Soundpack - sound definition resolver and resource pack tool
#[derive(Parser, Debug)]
#[command(name = "soundpack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Session configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sort platform versions
    #[command(name = "versions")]
    Versions {
        /// Versions to sort
        #[arg(required = true)]
        versions: Vec<String>,

        /// Newest first
        #[arg(short, long)]
        descending: bool,
    },

    /// Look up the pack format for a platform version
    #[command(name = "pack-format")]
    PackFormat {
        /// Platform version, or `latest`
        version: String,

        /// Version → pack format table (JSON); fetched when omitted
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Merge sound definition tables, left to right
    #[command(name = "merge")]
    Merge {
        /// Base sounds.json
        base: PathBuf,

        /// Overlay sounds.json files
        overlays: Vec<PathBuf>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a sound reference and preview it
    #[command(name = "resolve")]
    Resolve {
        /// Reference such as `minecraft:block.stone.hit`
        reference: String,

        /// Platform sounds.json
        #[arg(long)]
        platform: Option<PathBuf>,

        /// Mod sounds.json
        #[arg(long = "mod")]
        mod_sounds: Option<PathBuf>,

        /// Platform asset index (JSON)
        #[arg(long)]
        index: Option<PathBuf>,

        /// Resource pack (zip)
        #[arg(long)]
        pack: Option<PathBuf>,

        /// Treat the reference as a sound file rather than an event
        #[arg(long)]
        file: bool,

        #[arg(long, default_value_t = 1.0)]
        volume: f32,

        #[arg(long, default_value_t = 1.0)]
        pitch: f32,

        /// Seed for entry selection
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show a resource pack's metadata and sound entries
    #[command(name = "inspect-pack")]
    InspectPack {
        /// Resource pack (zip)
        pack: PathBuf,

        /// Version → pack format table (JSON)
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Build a resource pack from a directory
    #[command(name = "build-pack")]
    BuildPack {
        /// Directory holding `pack.mcmeta` and `assets/`
        dir: PathBuf,

        /// Output zip; defaults to the suggested export name
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Platform version to target
        #[arg(long)]
        target: Option<String>,

        /// Version → pack format table (JSON)
        #[arg(short, long)]
        table: Option<PathBuf>,
    },
}
