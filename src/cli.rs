//! Command line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tapline", version, about = "Four-lane rhythm game and chart editor")]
pub struct Cli {
    /// Path to the settings file.
    #[arg(long, global = true, default_value = crate::models::settings::SETTINGS_FILE)]
    pub settings: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Play a chart (a chart.json file or its song folder).
    Play { chart: PathBuf },
    /// Open a chart in the editor. Unreadable charts start empty.
    Edit { chart: PathBuf },
    /// Create a new song folder with an empty chart.
    New {
        folder: PathBuf,
        /// Audio file to copy into the folder.
        #[arg(long)]
        audio: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
    },
    /// List the songs in the configured songs directory.
    List,
}
