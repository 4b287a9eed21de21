//! Applies the transitions produced by the active state.

use super::GlobalState;
use super::app_state::AppState;
use crate::input::events::{InputCommand, InputContext};
use crate::models::stats::SessionResult;
use crate::state::editor::{EditorRequest, EditorState};
use crate::state::game::GameSession;
use crate::state::traits::Transition;
use crate::system::storage;

impl GlobalState {
    pub(super) fn apply_transition(&mut self, transition: Transition) {
        if transition == Transition::None {
            return;
        }
        let current = std::mem::replace(&mut self.current_state, AppState::Closed);
        let before = current.name();
        let next = match (transition, current) {
            (Transition::None, current) => current,
            (Transition::Exit, _) => AppState::Closed,
            (Transition::LeaveGame(result), _) => self.leave_game(result),
            (Transition::Editor(request), AppState::Editor(editor)) => {
                self.serve_editor(editor, request)
            }
            (Transition::Editor(request), current) => {
                log::warn!(
                    "LOGIC: Editor request {:?} outside the editor ({})",
                    request,
                    current.name()
                );
                current
            }
        };

        if next.name() != before {
            log::info!("LOGIC: {} -> {}", before, next.name());
        }
        self.current_state = next;
    }

    fn leave_game(&mut self, result: Option<SessionResult>) -> AppState {
        match &result {
            Some(r) => log::info!(
                "LOGIC: '{}' finished with rank {} ({:.2}%)",
                r.title,
                r.rank,
                r.accuracy
            ),
            None => log::info!("LOGIC: Session left without a result"),
        }

        let Some(mut editor) = self.suspended_editor.take() else {
            return AppState::Closed;
        };
        editor.set_status(match result {
            Some(r) => format!("Playtest: rank {} ({:.2}%)", r.rank, r.accuracy),
            None => "Playtest aborted".to_string(),
        });
        self.set_input_context(InputContext::Editor);
        AppState::Editor(editor)
    }

    fn serve_editor(&mut self, mut editor: EditorState, request: EditorRequest) -> AppState {
        match request {
            EditorRequest::Save => {
                match storage::save_song(editor.song()) {
                    Ok(path) => {
                        log::info!("STORAGE: Saved {:?}", path);
                        editor.set_status("Saved");
                    }
                    Err(e) => {
                        log::error!("STORAGE: Save failed: {}", e);
                        editor.set_status(format!("Save failed: {e}"));
                    }
                }
                AppState::Editor(editor)
            }
            EditorRequest::Reload => {
                let Some(folder) = editor.song().folder.clone() else {
                    editor.set_status("Nothing to reload");
                    return AppState::Editor(editor);
                };
                match storage::load_song(&folder, self.settings.lane_count) {
                    Ok(song) => {
                        editor.replace_song(song);
                        editor.set_status("Reloaded");
                    }
                    Err(e) => {
                        // Keep the chart in memory; it may hold unsaved work.
                        log::error!("STORAGE: Reload failed: {}", e);
                        editor.set_status(format!("Reload failed: {e}"));
                    }
                }
                AppState::Editor(editor)
            }
            EditorRequest::Playtest => {
                editor.stop_playback();
                editor.close_menu();
                let session =
                    GameSession::new(editor.song(), &self.settings, (self.audio_factory)());
                self.suspended_editor = Some(editor);
                self.set_input_context(InputContext::Gameplay);
                AppState::Game(session)
            }
            EditorRequest::Exit => {
                editor.stop_playback();
                AppState::Closed
            }
        }
    }

    fn set_input_context(&self, context: InputContext) {
        if let Err(e) = self.input_cmd_tx.send(InputCommand::SetContext(context)) {
            log::error!("LOGIC: Failed to switch input context: {}", e);
        }
    }

    /// Context the input thread should start in for the current state.
    pub(super) fn context_for(state: &AppState) -> InputContext {
        match state {
            AppState::Editor(_) => InputContext::Editor,
            _ => InputContext::Gameplay,
        }
    }
}
