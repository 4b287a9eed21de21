//! Application entry point and thread bootstrapper.

mod cli;
mod error;
mod input;
mod logic;
mod models;
mod render;
mod shared;
mod state;
mod system;

use crate::cli::{Cli, Command};
use crate::error::AppError;
use crate::models::chart::Song;
use crate::models::settings::Settings;
use crate::state::global::Launch;
use crate::system::bus::SystemBus;
use crate::system::storage;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings);

    match run(cli.command, settings, cli.settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("MAIN: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: Settings, settings_file: PathBuf) -> Result<(), AppError> {
    match command {
        Command::Play { chart } => {
            let song = storage::load_song(&chart, settings.lane_count)?;
            start_app(Launch::Play(song), settings, settings_file)
        }
        Command::Edit { chart } => {
            let song = storage::load_song_or_default(&chart, settings.lane_count);
            start_app(Launch::Edit(song), settings, settings_file)
        }
        Command::New {
            folder,
            audio,
            title,
        } => {
            let song = storage::create_song(&folder, audio.as_deref(), title.as_deref())?;
            println!("Created '{}' in {}", song.title, folder.display());
            Ok(())
        }
        Command::List => {
            let songs = storage::scan_songs(&settings.songs_dir, settings.lane_count)?;
            for song in &songs {
                print_song(song);
            }
            Ok(())
        }
    }
}

fn print_song(song: &Song) {
    let folder = song
        .folder
        .as_deref()
        .map(|f| f.display().to_string())
        .unwrap_or_default();
    println!(
        "{:<32} {:<20} {:>6.1} BPM {:>5} notes  {}",
        song.title,
        song.artist,
        song.chart.timing.bpm(),
        song.chart.len(),
        folder
    );
}

/// Starts the input and logic threads, then runs the window on this one.
fn start_app(launch: Launch, settings: Settings, settings_file: PathBuf) -> Result<(), AppError> {
    log::info!("MAIN: Booting tapline...");

    let bus = SystemBus::new();
    let input_manager = input::manager::InputManager::new(&settings.keybinds);
    let (width, height) = (settings.screen_width, settings.screen_height);

    input::start_thread(bus.clone(), input_manager)?;
    let logic = logic::start_thread(bus.clone(), settings, settings_file, launch)?;

    render::app::App::run(bus, width, height)?;

    if logic.join().is_err() {
        log::error!("MAIN: Logic thread panicked");
    }
    log::info!("MAIN: Bye");
    Ok(())
}
