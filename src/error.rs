//! Error types for chart loading and settings persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a persisted chart into an in-memory `Song`.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("cannot read chart file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed chart JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bpm must be positive, got {0}")]
    InvalidBpm(f64),

    #[error("scroll speed must be positive, got {0}")]
    InvalidSpeed(f64),

    #[error("note #{index} uses lane {lane}, but only {lane_count} lanes exist")]
    LaneOutOfRange {
        index: usize,
        lane: usize,
        lane_count: usize,
    },

    #[error("note #{index} has a negative time ({time} ms)")]
    NegativeTime { index: usize, time: i64 },

    #[error("note #{index} has a non-positive hold duration ({duration} ms)")]
    NegativeDuration { index: usize, duration: i64 },
}

/// Failure to read or write `settings.toml`.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot access settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Anything that stops the binary from starting or running.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("cannot start thread: {0}")]
    Thread(#[from] std::io::Error),

    #[error("window event loop failed: {0}")]
    Window(#[from] winit::error::EventLoopError),
}
