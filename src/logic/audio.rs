//! Audio playback interface used by the session and the editor.
//!
//! The core only ever talks to an [`AudioDevice`]. [`AudioManager`] forwards
//! commands to the dedicated audio thread without blocking the logic thread;
//! [`MutedAudio`] stands in when no track is available.

use crate::system::bus::{AudioCommand, SystemBus};
use crossbeam_channel::Sender;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Best-effort playback device. Every call is non-blocking.
pub trait AudioDevice: Send {
    /// Prepares a track; `false` means the session runs muted.
    fn load_track(&mut self, path: &Path) -> bool;
    /// Starts playback `start_secs` into the track.
    fn play(&mut self, start_secs: f64);
    /// True until the track ends or is stopped.
    fn is_playing(&self) -> bool;
    fn stop(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn set_volume(&mut self, _volume: f32) {}
    /// Where the track actually is, when the device can tell.
    fn position_secs(&self) -> Option<f64> {
        None
    }
}

/// Device used when no audio track could be loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedAudio;

impl AudioDevice for MutedAudio {
    fn load_track(&mut self, _path: &Path) -> bool {
        false
    }
    fn play(&mut self, _start_secs: f64) {}
    fn is_playing(&self) -> bool {
        false
    }
    fn stop(&mut self) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
}

/// Sends commands to the audio thread and reads back its shared state.
pub struct AudioManager {
    cmd_tx: Sender<AudioCommand>,
    position: Arc<AtomicU64>,
    sample_rate: Arc<AtomicU64>,
    channels: Arc<AtomicU64>,
    playing: Arc<AtomicBool>,
    device_ready: Arc<AtomicBool>,
    loaded: bool,
}

impl AudioManager {
    pub fn new(bus: &SystemBus) -> Self {
        Self {
            cmd_tx: bus.audio_cmd_tx.clone(),
            position: bus.audio_position.clone(),
            sample_rate: bus.audio_sample_rate.clone(),
            channels: bus.audio_channels.clone(),
            playing: bus.audio_playing.clone(),
            device_ready: bus.audio_device_ready.clone(),
            loaded: false,
        }
    }

    fn send(&self, cmd: AudioCommand) {
        if let Err(e) = self.cmd_tx.send(cmd) {
            log::error!("AUDIO: Audio thread unreachable: {}", e);
        }
    }

    /// Current playback position derived from the sample counter.
    pub fn position_seconds(&self) -> f64 {
        let samples = self.position.load(Ordering::Relaxed) as f64;
        let sample_rate = self.sample_rate.load(Ordering::Relaxed).max(1) as f64;
        let channels = self.channels.load(Ordering::Relaxed).max(1) as f64;

        samples / (sample_rate * channels)
    }
}

impl AudioDevice for AudioManager {
    fn load_track(&mut self, path: &Path) -> bool {
        if !self.device_ready.load(Ordering::Relaxed) {
            log::warn!("AUDIO: No output device, {:?} will not play", path);
            self.loaded = false;
            return false;
        }

        // Probe the header here so a broken file is reported synchronously.
        let probe = File::open(path)
            .map_err(|e| e.to_string())
            .and_then(|file| {
                rodio::Decoder::new(BufReader::new(file))
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            });

        match probe {
            Ok(()) => {
                self.send(AudioCommand::Load {
                    path: path.to_path_buf(),
                });
                self.loaded = true;
            }
            Err(e) => {
                log::warn!("AUDIO: Cannot use {:?} ({}), continuing muted", path, e);
                self.loaded = false;
            }
        }
        self.loaded
    }

    fn play(&mut self, start_secs: f64) {
        if !self.loaded {
            return;
        }
        self.playing.store(true, Ordering::Relaxed);
        self.send(AudioCommand::Seek {
            position_secs: start_secs.max(0.0) as f32,
        });
        self.send(AudioCommand::Play);
    }

    fn is_playing(&self) -> bool {
        self.loaded && self.playing.load(Ordering::Relaxed)
    }

    fn stop(&mut self) {
        self.playing.store(false, Ordering::Relaxed);
        self.send(AudioCommand::Stop);
    }

    fn pause(&mut self) {
        self.send(AudioCommand::Pause);
    }

    fn resume(&mut self) {
        self.send(AudioCommand::Play);
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCommand::SetVolume {
            volume: volume.clamp(0.0, 1.0),
        });
    }

    fn position_secs(&self) -> Option<f64> {
        self.loaded.then(|| self.position_seconds())
    }
}
