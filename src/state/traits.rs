//! Traits for state management.
//!
//! These traits define the common interface of the gameplay session and the
//! chart editor so the global state machine can drive either one.

use crate::input::events::GameAction;
use crate::models::stats::SessionResult;
use crate::state::editor::EditorRequest;

/// Transition result from handling an action or update.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Stay in current state.
    None,
    /// Gameplay is over. `None` when the player aborted before the end screen.
    LeaveGame(Option<SessionResult>),
    /// The editor asks the owner to perform I/O or switch mode.
    Editor(EditorRequest),
    /// Exit the application.
    Exit,
}

/// Trait for creating render-ready snapshots.
///
/// Snapshots are immutable captures of state sent to the window thread.
pub trait Snapshot {
    /// The snapshot type produced.
    type Output;

    /// Creates an immutable snapshot for rendering.
    fn create_snapshot(&self) -> Self::Output;
}

/// Trait for per-frame updates.
pub trait Update {
    /// Advances the state by one fixed step of `dt_ms` milliseconds.
    fn update(&mut self, dt_ms: f64) -> Option<Transition>;
}

/// Trait for handling game actions.
pub trait HandleAction {
    /// Handles a game action and returns any state transition.
    fn handle_action(&mut self, action: &GameAction) -> Transition;
}
