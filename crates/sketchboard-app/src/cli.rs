//! Command line interface for stored documents.

use anyhow::{Context as _, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use sketchboard_core::storage::{FileStorage, Storage};
use sketchboard_core::{Settings, Shape, ShapeUtils, export_shapes};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sketchboard", version, about = "Sketchboard whiteboard documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export a stored document as SVG
    Export {
        /// Document id
        id: String,
        /// Documents directory (defaults to the local data directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Color theme (defaults to the saved setting)
        #[arg(long, value_enum)]
        theme: Option<Theme>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List stored document ids
    List {
        /// Documents directory (defaults to the local data directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Light,
    Dark,
}

fn open_storage(dir: Option<PathBuf>) -> Result<FileStorage> {
    let storage = match dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    };
    Ok(storage)
}

/// Saved dark mode preference. Unreadable settings fall back to light.
fn saved_dark_mode() -> bool {
    match Settings::default_path().and_then(|path| Settings::load(&path)) {
        Ok(settings) => settings.is_dark_mode,
        Err(e) => {
            log::warn!("Using default settings: {}", e);
            false
        }
    }
}

/// Run a parsed command, writing results to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Command::Export {
            id,
            dir,
            theme,
            output,
        } => {
            let storage = open_storage(dir)?;
            let document = pollster::block_on(storage.load(&id))
                .with_context(|| format!("failed to load document {id}"))?;
            let shapes: Vec<&Shape> = document.shapes_ordered().collect();
            let is_dark_mode = match theme {
                Some(theme) => theme == Theme::Dark,
                None => saved_dark_mode(),
            };
            let svg = export_shapes(&ShapeUtils::new(), &shapes, is_dark_mode)
                .ok_or_else(|| anyhow!("document {id} has no shapes to export"))?;

            match output {
                Some(path) => {
                    std::fs::write(&path, svg)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    log::info!("Exported {} to {}", id, path.display());
                }
                None => writeln!(out, "{svg}")?,
            }
        }
        Command::List { dir } => {
            let storage = open_storage(dir)?;
            for id in pollster::block_on(storage.list())? {
                writeln!(out, "{id}")?;
            }
        }
    }
    Ok(())
}
