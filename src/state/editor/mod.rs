//! Chart editor: timeline scrolling, note placement, selection and playback.
//!
//! The editor owns its `Song` exclusively. Anything that touches the disk
//! or leaves the editor is emitted as an [`EditorRequest`] for the outer
//! state machine.

mod input;
mod snapshot;

pub mod debug_menu;
pub mod placement;
pub mod selection;
pub mod timeline;

use crate::logic::audio::AudioDevice;
use crate::models::chart::Song;
use crate::models::engine::PlayfieldLayout;
use crate::models::engine::timing::pixels_per_second;
use crate::models::settings::Settings;
use crate::state::traits::{Transition, Update};
use debug_menu::DebugMenu;
use placement::PendingHolds;
use selection::{ClipboardNote, Selection};
use timeline::Timeline;

/// Arrow-key scroll rate in chart ms per second.
const ARROW_SCROLL_MS_PER_SEC: f64 = 500.0;
/// Chart ms per wheel notch.
const WHEEL_STEP_MS: f64 = 50.0;
/// Pointer travel beyond which a left press is a marquee drag.
const DRAG_THRESHOLD_PX: f64 = 5.0;
const DEFAULT_SNAP: u32 = 4;

/// Work the editor hands to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorRequest {
    Save,
    Reload,
    Playtest,
    Exit,
}

/// Editor preview playback. The clock is frame-driven from where it started.
#[derive(Debug, Clone, Copy, Default)]
struct Playback {
    playing: bool,
    origin_ms: f64,
    elapsed_ms: f64,
    /// Scroll position the track was paused at, if paused rather than stopped.
    paused_at: Option<f64>,
}

pub struct EditorState {
    song: Song,
    layout: PlayfieldLayout,
    /// Chart time at the hit line.
    scroll_ms: f64,
    snap: u32,
    pixels_per_second: f64,

    audio: Box<dyn AudioDevice>,
    audio_loaded: bool,
    playback: Playback,

    scroll_up: bool,
    scroll_down: bool,
    pointer: (f64, f64),
    drag_start: Option<(f64, f64)>,

    selection: Selection,
    clipboard: Vec<ClipboardNote>,
    pending_holds: PendingHolds,
    menu: DebugMenu,
    status: Option<String>,
}

impl EditorState {
    pub fn new(song: Song, settings: &Settings, mut audio: Box<dyn AudioDevice>) -> Self {
        let layout = PlayfieldLayout::from_settings(settings);
        let audio_loaded = match song.audio_path() {
            Some(path) => {
                let loaded = audio.load_track(&path);
                if loaded {
                    audio.set_volume(settings.master_volume);
                }
                loaded
            }
            None => false,
        };
        if !audio_loaded {
            log::warn!("EDITOR: No playable audio for '{}'", song.title);
        }
        log::info!(
            "EDITOR: Editing '{}' ({} notes, {} BPM)",
            song.title,
            song.chart.len(),
            song.chart.timing.bpm()
        );

        let mut editor = Self {
            song,
            layout,
            scroll_ms: 0.0,
            snap: DEFAULT_SNAP,
            pixels_per_second: 0.0,
            audio,
            audio_loaded,
            playback: Playback::default(),
            scroll_up: false,
            scroll_down: false,
            pointer: (0.0, 0.0),
            drag_start: None,
            selection: Selection::new(),
            clipboard: Vec::new(),
            pending_holds: PendingHolds::new(),
            menu: DebugMenu::new(),
            status: None,
        };
        editor.refresh_scale();
        editor
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn close_menu(&mut self) {
        self.menu.close();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Swaps in a freshly loaded song, keeping the view where it was.
    pub fn replace_song(&mut self, song: Song) {
        self.stop_playback();
        self.song = song;
        self.selection.clear();
        self.pending_holds.cancel_all();
        self.refresh_scale();
    }

    pub(crate) fn timeline(&self) -> Timeline {
        Timeline {
            scroll_ms: self.scroll_ms,
            pixels_per_second: self.pixels_per_second,
            hit_line_y: self.layout.hit_line_y,
            bpm: self.song.chart.timing.bpm(),
            snap: self.snap,
        }
    }

    /// Recomputes the pixel scale after a speed change.
    fn refresh_scale(&mut self) {
        self.pixels_per_second = pixels_per_second(
            self.song.chart.timing.scroll_speed(),
            self.layout.frame_rate_hz,
        );
    }

    fn scroll_by(&mut self, delta_ms: f64) {
        self.scroll_ms = (self.scroll_ms + delta_ms).max(0.0);
    }

    fn toggle_playback(&mut self) {
        if self.playback.playing {
            self.audio.pause();
            self.playback.playing = false;
            self.playback.paused_at = Some(self.scroll_ms);
            log::debug!("EDITOR: Paused at {:.0}ms", self.scroll_ms);
            return;
        }

        if self.audio_loaded {
            match self.playback.paused_at {
                Some(at) if at == self.scroll_ms => self.audio.resume(),
                _ => self.audio.play(self.scroll_ms / 1000.0),
            }
        }
        self.scroll_up = false;
        self.scroll_down = false;
        self.playback = Playback {
            playing: true,
            origin_ms: self.scroll_ms,
            elapsed_ms: 0.0,
            paused_at: None,
        };
        log::debug!("EDITOR: Playing from {:.0}ms", self.scroll_ms);
    }

    pub fn stop_playback(&mut self) {
        if self.playback.playing || self.playback.paused_at.is_some() {
            self.audio.stop();
        }
        self.playback = Playback::default();
    }

    fn rewind(&mut self) {
        self.stop_playback();
        self.scroll_ms = 0.0;
    }
}

impl Update for EditorState {
    fn update(&mut self, dt_ms: f64) -> Option<Transition> {
        if self.playback.playing {
            self.playback.elapsed_ms += dt_ms;
            self.scroll_ms = self.playback.origin_ms + self.playback.elapsed_ms;
            if self.audio_loaded && !self.audio.is_playing() {
                log::debug!("EDITOR: Track ended at {:.0}ms", self.scroll_ms);
                self.playback = Playback::default();
            }
            return None;
        }

        if !self.menu.is_visible() {
            let direction = f64::from(self.scroll_down as u8) - f64::from(self.scroll_up as u8);
            if direction != 0.0 {
                self.scroll_by(direction * ARROW_SCROLL_MS_PER_SEC * dt_ms / 1000.0);
            }
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logic::audio::MutedAudio;
    use crate::models::chart::{Chart, Note};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// 50 fps: speed 7 gives 350 px per second.
    pub(crate) fn settings() -> Settings {
        Settings {
            fps: 50,
            ..Settings::default()
        }
    }

    pub(crate) fn editor(notes: Vec<Note>) -> EditorState {
        let mut song = Song::new("draft");
        song.chart = Chart::from_notes(notes);
        EditorState::new(song, &settings(), Box::new(MutedAudio))
    }

    #[derive(Clone, Default)]
    struct RecordingAudio {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl AudioDevice for RecordingAudio {
        fn load_track(&mut self, _path: &Path) -> bool {
            true
        }
        fn play(&mut self, start_secs: f64) {
            self.calls.lock().unwrap().push(format!("play {start_secs}"));
        }
        fn is_playing(&self) -> bool {
            true
        }
        fn stop(&mut self) {
            self.calls.lock().unwrap().push("stop".to_string());
        }
        fn pause(&mut self) {
            self.calls.lock().unwrap().push("pause".to_string());
        }
        fn resume(&mut self) {
            self.calls.lock().unwrap().push("resume".to_string());
        }
    }

    #[test]
    fn scale_follows_speed_and_frame_rate() {
        let editor = editor(Vec::new());
        assert_eq!(editor.pixels_per_second, 350.0);
        assert_eq!(editor.snap, 4);
        assert_eq!(editor.scroll_ms, 0.0);
    }

    #[test]
    fn held_arrows_scroll_at_a_fixed_rate() {
        let mut editor = editor(Vec::new());
        editor.scroll_down = true;
        for _ in 0..50 {
            editor.update(20.0);
        }
        assert!((editor.scroll_ms - 500.0).abs() < 1e-9);

        editor.scroll_down = false;
        editor.scroll_up = true;
        for _ in 0..100 {
            editor.update(20.0);
        }
        assert_eq!(editor.scroll_ms, 0.0);
    }

    #[test]
    fn muted_playback_follows_the_frame_clock() {
        let mut editor = editor(Vec::new());
        editor.scroll_ms = 1000.0;
        editor.toggle_playback();
        assert!(editor.playback.playing);
        for _ in 0..10 {
            editor.update(20.0);
        }
        assert!((editor.scroll_ms - 1200.0).abs() < 1e-9);

        editor.toggle_playback();
        editor.update(20.0);
        assert!((editor.scroll_ms - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn pause_then_resume_in_place() {
        let audio = RecordingAudio::default();
        let mut song = Song::new("draft");
        song.audio_file = "song.ogg".to_string();
        song.folder = Some("songs/draft".into());
        let mut editor = EditorState::new(song, &settings(), Box::new(audio.clone()));

        editor.scroll_ms = 500.0;
        editor.toggle_playback();
        editor.update(20.0);
        editor.toggle_playback();
        editor.toggle_playback();
        editor.toggle_playback();
        editor.scroll_ms = 2000.0;
        editor.toggle_playback();
        editor.rewind();

        assert_eq!(
            *audio.calls.lock().unwrap(),
            vec!["play 0.5", "pause", "resume", "pause", "play 2", "stop"]
        );
        assert_eq!(editor.scroll_ms, 0.0);
        assert!(!editor.playback.playing);
    }
}
