//! Data model: persisted charts, runtime note state, stats and settings.

pub mod chart;
pub mod chart_file;
pub mod engine;
pub mod settings;
pub mod stats;
