//! Soundpack CLI
//!
//! Command-line interface for sound tables and resource packs.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use soundpack::cli::commands::{self, ResolveOptions};
use soundpack::cli::{Cli, Commands};
use soundpack::config::SessionConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Soundpack v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::default(),
    }
    .with_env_overrides();

    match cli.command {
        Some(cmd) => handle_command(config, cmd).await,
        None => {
            println!("Soundpack v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

async fn handle_command(config: SessionConfig, cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Versions {
            versions,
            descending,
        } => commands::versions(&versions, descending)?,
        Commands::PackFormat { version, table } => {
            commands::pack_format(&config, &version, table.as_deref()).await?
        }
        Commands::Merge {
            base,
            overlays,
            output,
        } => commands::merge(&base, &overlays, output.as_deref())?,
        Commands::Resolve {
            reference,
            platform,
            mod_sounds,
            index,
            pack,
            file,
            volume,
            pitch,
            seed,
        } => {
            let options = ResolveOptions {
                reference,
                platform,
                mod_sounds,
                index,
                pack,
                is_event: !file,
                volume,
                pitch,
                seed,
            };
            commands::resolve(config, options).await?
        }
        Commands::InspectPack { pack, table } => {
            commands::inspect_pack(&config, &pack, table.as_deref()).await?
        }
        Commands::BuildPack {
            dir,
            output,
            target,
            table,
        } => {
            commands::build_pack(
                &config,
                &dir,
                output.as_deref(),
                target.as_deref(),
                table.as_deref(),
            )
            .await?
        }
    }
    Ok(())
}
