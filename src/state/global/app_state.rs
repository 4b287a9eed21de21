//! Application state enum for the state machine.

use crate::state::editor::EditorState;
use crate::state::game::GameSession;

/// High-level application states driven by `GlobalState`.
pub(super) enum AppState {
    /// A play session, either standalone or a playtest.
    Game(GameSession),
    /// Chart editor.
    Editor(EditorState),
    /// Nothing left to run; the logic thread shuts down.
    Closed,
}

impl AppState {
    pub(super) fn name(&self) -> &'static str {
        match self {
            AppState::Game(_) => "Game",
            AppState::Editor(_) => "Editor",
            AppState::Closed => "Closed",
        }
    }
}
