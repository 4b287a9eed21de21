//! Global state management for the application state machine.

mod app_state;
mod transitions;

use app_state::AppState;

use crate::input::events::{GameAction, InputCommand, InputContext};
use crate::logic::audio::AudioDevice;
use crate::models::chart::Song;
use crate::models::settings::Settings;
use crate::shared::snapshot::RenderState;
use crate::state::editor::EditorState;
use crate::state::game::GameSession;
use crate::state::traits::{HandleAction, Snapshot, Transition, Update};
use crate::system::bus::SystemEvent;
use crossbeam_channel::Sender;
use std::path::PathBuf;

/// Builds a fresh audio device for each session or editor.
pub type AudioFactory = Box<dyn Fn() -> Box<dyn AudioDevice> + Send>;

/// What the application opens with.
pub enum Launch {
    Play(Song),
    Edit(Song),
}

/// Owns the long-lived state machine for gameplay and the editor.
pub struct GlobalState {
    current_state: AppState,
    /// Editor waiting for a playtest to finish.
    suspended_editor: Option<EditorState>,
    settings: Settings,
    /// Re-read for key bindings whenever the window regains focus.
    settings_file: Option<PathBuf>,
    input_cmd_tx: Sender<InputCommand>,
    audio_factory: AudioFactory,
}

impl GlobalState {
    pub fn new(
        launch: Launch,
        settings: Settings,
        input_cmd_tx: Sender<InputCommand>,
        audio_factory: AudioFactory,
    ) -> Self {
        log::info!("LOGIC: Initializing Global State");
        let current_state = match launch {
            Launch::Play(song) => {
                AppState::Game(GameSession::new(&song, &settings, audio_factory()))
            }
            Launch::Edit(song) => {
                AppState::Editor(EditorState::new(song, &settings, audio_factory()))
            }
        };

        let context = Self::context_for(&current_state);
        if let Err(e) = input_cmd_tx.send(InputCommand::SetContext(context)) {
            log::error!("LOGIC: Failed to set initial input context: {}", e);
        }

        Self {
            current_state,
            suspended_editor: None,
            settings,
            settings_file: None,
            input_cmd_tx,
            audio_factory,
        }
    }

    pub fn with_settings_file(mut self, path: PathBuf) -> Self {
        self.settings_file = Some(path);
        self
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.current_state, AppState::Closed)
    }

    /// Ticks the active state and applies whatever transition it asks for.
    pub fn update(&mut self, dt_ms: f64) {
        let transition = match &mut self.current_state {
            AppState::Game(session) => session.update(dt_ms),
            AppState::Editor(editor) => editor.update(dt_ms),
            AppState::Closed => None,
        };
        if let Some(transition) = transition {
            self.apply_transition(transition);
        }
    }

    /// Routes a `GameAction` to the current state and applies the resulting transition.
    pub fn handle_action(&mut self, action: GameAction) {
        let transition = match &mut self.current_state {
            AppState::Game(session) => session.handle_action(&action),
            AppState::Editor(editor) => editor.handle_action(&action),
            AppState::Closed => Transition::None,
        };
        self.apply_transition(transition);
    }

    pub fn handle_system(&mut self, event: SystemEvent) {
        match event {
            SystemEvent::Quit => {
                log::info!("LOGIC: Quit requested");
                match &mut self.current_state {
                    AppState::Game(session) => session.abort(),
                    AppState::Editor(editor) => editor.stop_playback(),
                    AppState::Closed => {}
                }
                if let Some(editor) = &mut self.suspended_editor {
                    editor.stop_playback();
                }
                self.apply_transition(Transition::Exit);
            }
            SystemEvent::Resize { width, height } => {
                log::debug!("LOGIC: Window resized to {}x{}", width, height);
            }
            SystemEvent::FocusGained => self.reload_keybinds_from_disk(),
            SystemEvent::FocusLost => {}
        }
    }

    /// Picks up key bindings edited while the window was in the background.
    fn reload_keybinds_from_disk(&mut self) {
        let Some(path) = &self.settings_file else {
            return;
        };
        let keybinds = match Settings::read(path) {
            Ok(disk) => disk.keybinds,
            Err(e) => {
                log::warn!("SETTINGS: Keeping current keybinds: {}", e);
                return;
            }
        };
        if keybinds == self.settings.keybinds {
            return;
        }

        log::info!("SETTINGS: Keybinds changed on disk: {:?}", keybinds);
        self.settings.keybinds = keybinds.clone();
        if let Err(e) = self.input_cmd_tx.send(InputCommand::ReloadKeybinds(keybinds)) {
            log::error!("LOGIC: Failed to forward keybinds to input thread: {}", e);
        }
    }

    /// Produces a render-ready snapshot for the window thread.
    pub fn create_snapshot(&self) -> RenderState {
        match &self.current_state {
            AppState::Game(session) => RenderState::Gameplay(session.create_snapshot()),
            AppState::Editor(editor) => RenderState::Editor(editor.create_snapshot()),
            AppState::Closed => RenderState::Exit,
        }
    }
}
