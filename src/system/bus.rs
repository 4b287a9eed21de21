//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` is the single hub through which the window, input, logic
//! and audio threads talk to each other.

use crate::input::events::{GameAction, InputCommand, RawInputEvent};
use crate::shared::snapshot::RenderState;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64};

/// System-level events sent by the window thread.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    Resize { width: u32, height: u32 },
    FocusLost,
    FocusGained,
    Quit,
}

/// Commands sent to the dedicated audio thread.
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Load an audio file, paused at the start.
    Load { path: PathBuf },
    Play,
    Pause,
    /// Stop and reset playback position.
    Stop,
    /// Reposition (in seconds); playback stays paused until `Play`.
    Seek { position_secs: f32 },
    /// 0.0 to 1.0
    SetVolume { volume: f32 },
}

/// Aggregates the cross-thread communication channels.
#[derive(Clone)]
pub struct SystemBus {
    /// Window → Input: raw keyboard events.
    pub raw_input_tx: Sender<RawInputEvent>,
    pub raw_input_rx: Receiver<RawInputEvent>,

    /// Logic → Input: binding reloads and context switches.
    pub input_cmd_tx: Sender<InputCommand>,
    pub input_cmd_rx: Receiver<InputCommand>,

    /// Input/Window → Logic: resolved actions.
    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    /// Logic → Window: state snapshots.
    pub render_tx: Sender<RenderState>,
    pub render_rx: Receiver<RenderState>,

    /// Window → Logic: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,

    /// Logic → Audio: playback commands.
    pub audio_cmd_tx: Sender<AudioCommand>,
    pub audio_cmd_rx: Receiver<AudioCommand>,

    /// Playback position in samples, written by the audio thread.
    pub audio_position: Arc<AtomicU64>,
    pub audio_sample_rate: Arc<AtomicU64>,
    pub audio_channels: Arc<AtomicU64>,

    /// Set on `play`, cleared by the audio thread when the track drains.
    pub audio_playing: Arc<AtomicBool>,
    /// Whether an output device was found at startup.
    pub audio_device_ready: Arc<AtomicBool>,
}

impl SystemBus {
    pub fn new() -> Self {
        let (raw_input_tx, raw_input_rx) = unbounded();
        let (input_cmd_tx, input_cmd_rx) = unbounded();
        let (action_tx, action_rx) = unbounded();

        // At most 2 frames queued to limit latency.
        let (render_tx, render_rx) = bounded(2);

        let (sys_tx, sys_rx) = unbounded();
        let (audio_cmd_tx, audio_cmd_rx) = unbounded();

        Self {
            raw_input_tx,
            raw_input_rx,
            input_cmd_tx,
            input_cmd_rx,
            action_tx,
            action_rx,
            render_tx,
            render_rx,
            sys_tx,
            sys_rx,
            audio_cmd_tx,
            audio_cmd_rx,
            audio_position: Arc::new(AtomicU64::new(0)),
            audio_sample_rate: Arc::new(AtomicU64::new(44100)),
            audio_channels: Arc::new(AtomicU64::new(2)),
            audio_playing: Arc::new(AtomicBool::new(false)),
            audio_device_ready: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
