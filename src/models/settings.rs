//! User settings persisted in `settings.toml`.

use crate::error::SettingsError;
use crate::models::engine::constants::{COUNTDOWN_MS, DEFAULT_FPS, DEFAULT_LANE_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed-step frame rate of the logic loop.
    pub fps: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Hit line distance from the bottom of the screen.
    pub hit_line_offset: u32,
    pub lane_count: usize,
    pub lane_width: u32,
    pub note_height: u32,
    pub countdown_ms: u32,
    /// 0.0 to 1.0
    pub master_volume: f32,
    pub songs_dir: PathBuf,
    /// One key label per lane, e.g. `["S", "D", "J", "K"]`.
    pub keybinds: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            screen_width: 1200,
            screen_height: 600,
            hit_line_offset: 100,
            lane_count: DEFAULT_LANE_COUNT,
            lane_width: 120,
            note_height: 30,
            countdown_ms: COUNTDOWN_MS,
            master_volume: 0.7,
            songs_dir: PathBuf::from("songs"),
            keybinds: ["S", "D", "J", "K"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Loads settings, writing defaults when the file does not exist yet.
    ///
    /// A broken file is reported and replaced by defaults in memory only.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            let settings = Self::default();
            match settings.save(path) {
                Ok(()) => log::info!("SETTINGS: Wrote defaults to {:?}", path),
                Err(e) => log::warn!("SETTINGS: Could not write defaults: {}", e),
            }
            return settings;
        }

        match Self::read(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("SETTINGS: {}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.fps.max(1) as f64
    }
}
