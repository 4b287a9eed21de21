//! Gameplay session: countdown, note spawning, judgement and the end screen.
//!
//! The session is driven by fixed frame steps. One call to `update` runs:
//! 1. clock advance
//! 2. queued key input
//! 3. spawning of due notes
//! 4. note movement
//! 5. miss / hold-completion sweep
//! 6. max combo bookkeeping
//! 7. pruning of resolved notes

mod input;
mod notes;
mod snapshot;

pub mod judgement;

use crate::logic::audio::AudioDevice;
use crate::models::chart::{Chart, Song};
use crate::models::engine::constants::{JUDGEMENT_DISPLAY_FRAMES, KEY_FEEDBACK_FRAMES};
use crate::models::engine::timing::chart_start_offset;
use crate::models::engine::{ActiveNote, HitWindows, PlayfieldLayout, TimingModel};
use crate::models::settings::Settings;
use crate::models::stats::{JudgementTier, SessionResult, SessionStats};
use crate::state::traits::{Transition, Update};
use judgement::JudgementEngine;
use std::collections::VecDeque;
use std::fmt;

/// Lifecycle of one play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Countdown,
    Playing,
    Ending,
    EndScreen,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::Countdown => "Countdown",
            SessionPhase::Playing => "Playing",
            SessionPhase::Ending => "Ending",
            SessionPhase::EndScreen => "Results",
        };
        f.write_str(label)
    }
}

/// A key event waiting for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LaneInput {
    Down(usize),
    Up(usize),
}

/// The transient judgement text shown over the lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgementBanner {
    pub tier: JudgementTier,
    pub frames_left: u32,
}

pub struct GameSession {
    title: String,
    chart: Chart,
    layout: PlayfieldLayout,
    timing: TimingModel,
    judge: JudgementEngine,

    audio: Box<dyn AudioDevice>,
    audio_loaded: bool,
    audio_started: bool,

    phase: SessionPhase,
    /// Chart time at which the song (and audio) starts.
    start_offset: f64,
    /// Current chart time in ms. Negative during the countdown of a chart
    /// that starts at 0.
    current_time: f64,

    /// Index of the next chart note to spawn.
    next_index: usize,
    notes: Vec<ActiveNote>,
    stats: SessionStats,

    pending_input: VecDeque<LaneInput>,
    key_feedback: Vec<u32>,
    banner: Option<JudgementBanner>,
    result: Option<SessionResult>,
}

impl GameSession {
    /// Prepares a session for `song`. The chart is copied; the caller's
    /// song is never touched.
    ///
    /// A missing or unplayable audio track is not an error: the session
    /// runs muted on the frame clock alone.
    pub fn new(song: &Song, settings: &Settings, mut audio: Box<dyn AudioDevice>) -> Self {
        let layout = PlayfieldLayout::from_settings(settings);
        let chart = Chart::with_timing(song.chart.notes().to_vec(), song.chart.timing);
        let timing = TimingModel::new(
            chart.timing.scroll_speed(),
            layout.travel_distance(),
            layout.frame_rate_hz,
        );

        let start_offset = chart_start_offset(
            &chart,
            timing.lead_ms(),
            chart.timing.use_custom_start,
            chart.timing.start_offset_ms(),
        );

        let audio_loaded = match song.audio_path() {
            Some(path) => {
                let loaded = audio.load_track(&path);
                if loaded {
                    audio.set_volume(settings.master_volume);
                } else {
                    log::warn!("SESSION: Audio {:?} unavailable, playing muted", path);
                }
                loaded
            }
            None => {
                log::warn!("SESSION: '{}' has no audio track, playing muted", song.title);
                false
            }
        };

        log::info!(
            "SESSION: '{}' with {} notes, lead {:.1}ms, start at {:.0}ms",
            song.title,
            chart.len(),
            timing.lead_ms(),
            start_offset
        );

        Self {
            title: song.title.clone(),
            judge: JudgementEngine::new(HitWindows::new(), layout.hit_line_y),
            key_feedback: vec![0; layout.lane_count],
            chart,
            layout,
            timing,
            audio,
            audio_loaded,
            audio_started: false,
            phase: SessionPhase::Countdown,
            start_offset,
            current_time: start_offset - settings.countdown_ms as f64,
            next_index: 0,
            notes: Vec::new(),
            stats: SessionStats::new(),
            pending_input: VecDeque::new(),
            banner: None,
            result: None,
        }
    }

    /// Stops playback and drops the session's in-flight state.
    pub fn abort(&mut self) {
        log::info!("SESSION: Aborted at {:.0}ms", self.current_time);
        self.audio.stop();
        self.pending_input.clear();
        self.notes.clear();
    }

    fn advance_clock(&mut self, dt_ms: f64) {
        self.current_time += dt_ms;

        if self.phase == SessionPhase::Countdown && self.current_time >= self.start_offset {
            self.phase = SessionPhase::Playing;
            if self.audio_loaded {
                self.audio.play(self.start_offset / 1000.0);
                self.audio_started = true;
            }
            log::info!("SESSION: Playing from {:.0}ms", self.start_offset);
        }
    }

    fn process_pending_input(&mut self) {
        while let Some(input) = self.pending_input.pop_front() {
            match input {
                LaneInput::Down(lane) => {
                    self.key_feedback[lane] = KEY_FEEDBACK_FRAMES;
                    if let Some(tier) = self.judge.on_key_down(
                        lane,
                        self.current_time,
                        &mut self.notes,
                        &mut self.stats,
                    ) {
                        self.show_judgement(tier);
                    }
                }
                LaneInput::Up(lane) => {
                    self.judge
                        .on_key_up(lane, self.current_time, &mut self.notes, &mut self.stats);
                }
            }
        }
    }

    fn show_judgement(&mut self, tier: JudgementTier) {
        self.banner = Some(JudgementBanner {
            tier,
            frames_left: JUDGEMENT_DISPLAY_FRAMES,
        });
    }

    fn tick_feedback(&mut self) {
        for frames in &mut self.key_feedback {
            *frames = frames.saturating_sub(1);
        }
        if let Some(banner) = &mut self.banner {
            banner.frames_left = banner.frames_left.saturating_sub(1);
            if banner.frames_left == 0 {
                self.banner = None;
            }
        }
    }

    /// With audio the song lasts as long as the track. Without it, the
    /// session ends once every note has been spawned and resolved.
    fn is_song_over(&self) -> bool {
        if self.audio_loaded {
            self.audio_started && !self.audio.is_playing()
        } else {
            self.next_index >= self.chart.len() && self.notes.is_empty()
        }
    }

    fn finish(&mut self) {
        let result = SessionResult::from_stats(&self.title, &self.stats, self.chart.len());
        log::info!(
            "SESSION: Finished '{}': score {}, accuracy {:.2}%, rank {}, max combo {}",
            result.title,
            result.score,
            result.accuracy,
            result.rank,
            result.max_combo
        );
        self.result = Some(result);
        self.phase = SessionPhase::EndScreen;
    }
}

impl Update for GameSession {
    fn update(&mut self, dt_ms: f64) -> Option<Transition> {
        match self.phase {
            SessionPhase::EndScreen => return None,
            SessionPhase::Ending => {
                self.finish();
                return None;
            }
            SessionPhase::Countdown | SessionPhase::Playing => {}
        }

        self.advance_clock(dt_ms);
        self.process_pending_input();
        self.spawn_due_notes(dt_ms);
        self.advance_notes(dt_ms);

        let report = self
            .judge
            .on_frame_tick(self.current_time, &mut self.notes, &mut self.stats);
        if report.misses > 0 {
            self.show_judgement(JudgementTier::Miss);
        }

        self.stats.sync_max_combo();
        self.prune_notes();
        self.tick_feedback();

        if self.is_song_over() {
            self.audio.stop();
            self.phase = SessionPhase::Ending;
            log::info!("SESSION: Song over at {:.0}ms", self.current_time);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::GameAction;
    use crate::logic::audio::MutedAudio;
    use crate::models::chart::{ChartTiming, Note};
    use crate::models::engine::timing::note_y_position;
    use crate::models::stats::Rank;
    use crate::state::traits::HandleAction;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// 50 fps keeps every frame step an exact 20 ms.
    const FRAME: f64 = 20.0;

    fn settings() -> Settings {
        Settings {
            fps: 50,
            ..Settings::default()
        }
    }

    fn song(notes: Vec<Note>) -> Song {
        let mut song = Song::new("test");
        song.chart = Chart::from_notes(notes);
        song
    }

    fn muted(song: &Song) -> GameSession {
        GameSession::new(song, &settings(), Box::new(MutedAudio))
    }

    /// Steps frames until `time` is reached or the song is over.
    fn run_until(session: &mut GameSession, time: f64) {
        while session.current_time < time
            && matches!(
                session.phase,
                SessionPhase::Countdown | SessionPhase::Playing
            )
        {
            session.update(FRAME);
        }
    }

    /// Records calls and lets the test decide when the track ends.
    #[derive(Clone, Default)]
    struct ScriptedAudio {
        calls: Arc<Mutex<Vec<String>>>,
        playing: Arc<AtomicBool>,
    }

    impl ScriptedAudio {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn finish_track(&self) {
            self.playing.store(false, Ordering::SeqCst);
        }
    }

    impl AudioDevice for ScriptedAudio {
        fn load_track(&mut self, path: &Path) -> bool {
            self.calls.lock().unwrap().push(format!("load {}", path.display()));
            true
        }
        fn play(&mut self, start_secs: f64) {
            self.calls.lock().unwrap().push(format!("play {start_secs}"));
            self.playing.store(true, Ordering::SeqCst);
        }
        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::SeqCst)
        }
        fn stop(&mut self) {
            self.calls.lock().unwrap().push("stop".to_string());
            self.playing.store(false, Ordering::SeqCst);
        }
        fn pause(&mut self) {}
        fn resume(&mut self) {}
    }

    #[test]
    fn on_time_press_is_perfect_at_high_scroll_speed() {
        // 25 px per frame: one frame of drift is already outside Perfect in px.
        let mut song = song(vec![Note::tap(0, 1000)]);
        song.chart.timing = ChartTiming::new(120.0, 25.0);
        let mut session = muted(&song);
        run_until(&mut session, 980.0);
        assert_eq!(session.notes.len(), 1);

        session.handle_action(&GameAction::Hit { lane: 0 });
        session.update(FRAME);

        assert_eq!(session.current_time, 1000.0);
        assert_eq!(session.stats.counts.perfect, 1);
        assert_eq!(session.stats.counts.great, 0);
    }

    #[test]
    fn countdown_precedes_the_start_offset() {
        let session = muted(&song(vec![Note::tap(0, 1000)]));
        assert_eq!(session.start_offset, 0.0);
        assert_eq!(session.current_time, -3000.0);
        assert_eq!(session.phase, SessionPhase::Countdown);
    }

    #[test]
    fn on_time_press_is_perfect() {
        let mut session = muted(&song(vec![Note::tap(0, 1000)]));
        run_until(&mut session, 980.0);
        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(session.notes.len(), 1);

        session.handle_action(&GameAction::Hit { lane: 0 });
        session.update(FRAME);

        let stats = &session.stats;
        assert_eq!(stats.counts.perfect, 1);
        assert_eq!(stats.score, 100);
        assert_eq!(stats.combo, 1);
        assert!(session.notes.is_empty());
    }

    #[test]
    fn notes_spawn_once_at_the_lead_time() {
        let mut session = muted(&song(vec![Note::tap(0, 1000), Note::tap(1, 1000)]));
        // Lead at 7 px/frame, 50 fps over 500 px is 1428.57 ms.
        run_until(&mut session, -440.0);
        assert!(session.notes.is_empty());
        session.update(FRAME);
        assert_eq!(session.notes.len(), 2);
        for note in &session.notes {
            assert!(note.y >= 0.0 && note.y < 7.0, "spawned at {}", note.y);
        }
        session.update(FRAME);
        assert_eq!(session.notes.len(), 2);
    }

    #[test]
    fn incremental_positions_track_the_closed_form() {
        let mut session = muted(&song(vec![Note::tap(2, 4000)]));
        run_until(&mut session, 3000.0);
        let y = session.notes[0].y;
        let expected = note_y_position(500.0, 4000.0, session.current_time, 7.0, 50.0);
        assert!((y - expected).abs() < 1e-6, "y was {y}, expected {expected}");
    }

    #[test]
    fn unhit_note_is_missed_and_session_ends() {
        let mut session = muted(&song(vec![Note::tap(0, 1000)]));
        session.stats.combo = 4;
        run_until(&mut session, 1300.0);

        assert_eq!(session.stats.counts.miss, 1);
        assert_eq!(session.stats.combo, 0);
        assert_eq!(session.phase, SessionPhase::Ending);

        session.update(FRAME);
        assert_eq!(session.phase, SessionPhase::EndScreen);
        let result = session.result.clone().unwrap();
        assert_eq!(result.accuracy, 0.0);
        assert_eq!(result.rank, Rank::F);
    }

    #[test]
    fn held_hold_note_completes() {
        let mut session = muted(&song(vec![Note::hold(1, 0, 500)]));
        run_until(&mut session, -FRAME);
        session.handle_action(&GameAction::Hit { lane: 1 });
        session.update(FRAME);
        assert_eq!(session.current_time, 0.0);
        assert!(session.notes[0].is_holding);

        run_until(&mut session, 480.0);
        assert!(session.notes[0].is_holding);
        session.handle_action(&GameAction::Release { lane: 1 });
        session.update(FRAME);

        let stats = &session.stats;
        assert_eq!(stats.combo, 2);
        assert_eq!(stats.max_combo, 2);
        assert_eq!(stats.score, 200);
        assert!(session.notes.is_empty());
    }

    #[test]
    fn empty_chart_ends_immediately() {
        let mut session = muted(&song(Vec::new()));
        session.update(FRAME);
        assert_eq!(session.phase, SessionPhase::Ending);
        session.update(FRAME);
        let result = session.result.clone().unwrap();
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.rank, Rank::S);

        let transition = session.handle_action(&GameAction::Confirm);
        assert!(matches!(transition, Transition::LeaveGame(Some(_))));
    }

    #[test]
    fn audio_starts_at_the_offset_and_bounds_the_session() {
        let audio = ScriptedAudio::default();
        let mut song = song(vec![Note::tap(0, 500)]);
        song.audio_file = "track.ogg".into();
        song.chart.timing.use_custom_start = true;
        song.chart.timing.set_start_offset_ms(2500);

        let mut session = GameSession::new(&song, &settings(), Box::new(audio.clone()));
        assert!(session.audio_loaded);
        assert_eq!(session.current_time, -500.0);

        run_until(&mut session, 2500.0);
        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(audio.calls(), vec!["load track.ogg", "play 2.5"]);

        // Notes are long gone, but the track keeps the session alive.
        for _ in 0..100 {
            session.update(FRAME);
        }
        assert_eq!(session.phase, SessionPhase::Playing);

        audio.finish_track();
        session.update(FRAME);
        assert_eq!(session.phase, SessionPhase::Ending);
    }

    #[test]
    fn escape_aborts_and_stops_audio() {
        let audio = ScriptedAudio::default();
        let mut song = song(vec![Note::tap(0, 5000)]);
        song.audio_file = "track.ogg".into();
        let mut session = GameSession::new(&song, &settings(), Box::new(audio.clone()));

        run_until(&mut session, 4000.0);
        let transition = session.handle_action(&GameAction::Back);
        assert_eq!(transition, Transition::LeaveGame(None));
        assert_eq!(audio.calls().last().map(String::as_str), Some("stop"));
    }

    #[test]
    fn key_feedback_and_banner_expire() {
        let mut session = muted(&song(vec![Note::tap(3, 1000), Note::tap(1, 5000)]));
        run_until(&mut session, 980.0);
        session.handle_action(&GameAction::Hit { lane: 3 });
        session.handle_action(&GameAction::Hit { lane: 0 });
        session.update(FRAME);

        assert_eq!(session.key_feedback[3], KEY_FEEDBACK_FRAMES - 1);
        assert_eq!(session.key_feedback[0], KEY_FEEDBACK_FRAMES - 1);
        assert_eq!(session.banner.map(|b| b.tier), Some(JudgementTier::Perfect));

        for _ in 0..KEY_FEEDBACK_FRAMES {
            session.update(FRAME);
        }
        assert_eq!(session.key_feedback[3], 0);
        assert!(session.banner.is_some());
    }

    #[test]
    fn out_of_range_lanes_are_ignored() {
        let mut session = muted(&song(vec![Note::tap(0, 1000)]));
        session.handle_action(&GameAction::Hit { lane: 9 });
        session.update(FRAME);
        assert_eq!(session.stats, SessionStats::new());
    }
}
