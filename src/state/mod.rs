//! State management module.
//!
//! This module contains the application states and their logic:
//! - `GameSession` - a play session from countdown to end screen
//! - `EditorState` - the chart editor
//! - `GlobalState` - the state machine switching between them
//!
//! Each state implements common traits for snapshots, updates, and action handling.

pub mod editor;
pub mod game;
pub mod global;
pub mod traits;
