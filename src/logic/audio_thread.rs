//! Dedicated audio thread that owns the rodio output stream.
//!
//! Loading and seeking decode files, so they never run on the logic thread.

use crate::system::bus::{AudioCommand, SystemBus};
use crossbeam_channel::{RecvTimeoutError, bounded};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// How often the worker checks whether the track has run out.
const END_POLL_INTERVAL: Duration = Duration::from_millis(10);

struct AudioWorker {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    current_path: Option<PathBuf>,
    volume: f32,
    sample_rate: u32,
    channels: u16,
    position_counter: Arc<AtomicU64>,
}

impl AudioWorker {
    fn new(bus: &SystemBus) -> Self {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => {
                log::info!("AUDIO: Device found, audio enabled");
                (Some(stream), Some(handle))
            }
            Err(e) => {
                log::warn!("AUDIO: No audio device found ({}), running in silent mode", e);
                (None, None)
            }
        };

        Self {
            _stream: stream,
            stream_handle,
            sink: None,
            current_path: None,
            volume: 0.7,
            sample_rate: 44100,
            channels: 2,
            position_counter: bus.audio_position.clone(),
        }
    }

    fn has_device(&self) -> bool {
        self.stream_handle.is_some()
    }

    fn handle_command(&mut self, cmd: AudioCommand, bus: &SystemBus) {
        match cmd {
            AudioCommand::Load { path } => {
                self.current_path = Some(path);
                self.load_from_position(0.0, bus);
            }
            AudioCommand::Play => {
                if let Some(sink) = &self.sink {
                    sink.play();
                }
            }
            AudioCommand::Pause => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
            }
            AudioCommand::Stop => {
                if let Some(sink) = self.sink.take() {
                    sink.stop();
                }
                self.position_counter.store(0, Ordering::Relaxed);
                bus.audio_playing.store(false, Ordering::Relaxed);
            }
            AudioCommand::Seek { position_secs } => {
                self.load_from_position(position_secs, bus);
            }
            AudioCommand::SetVolume { volume } => {
                self.volume = volume;
                if let Some(sink) = &self.sink {
                    sink.set_volume(volume);
                }
            }
        }
    }

    /// Rebuilds the sink paused at `position_secs`.
    fn load_from_position(&mut self, position_secs: f32, bus: &SystemBus) {
        let Some(stream_handle) = &self.stream_handle else {
            return;
        };
        let Some(path) = &self.current_path else {
            return;
        };

        if let Some(sink) = self.sink.take() {
            sink.stop();
        }

        let Some(source) = open_source(path) else {
            bus.audio_playing.store(false, Ordering::Relaxed);
            return;
        };

        self.sample_rate = source.sample_rate();
        self.channels = source.channels();
        bus.audio_sample_rate
            .store(self.sample_rate as u64, Ordering::Relaxed);
        bus.audio_channels
            .store(self.channels as u64, Ordering::Relaxed);

        let position_secs = position_secs.max(0.0);
        let skipped_samples =
            (position_secs as f64 * self.sample_rate as f64 * self.channels as f64) as u64;
        self.position_counter
            .store(skipped_samples, Ordering::Relaxed);

        let monitor = AudioMonitor {
            inner: source.skip_duration(Duration::from_secs_f32(position_secs)),
            position_counter: self.position_counter.clone(),
        };

        let Ok(sink) = Sink::try_new(stream_handle) else {
            log::error!("AUDIO: Failed to create sink");
            return;
        };
        sink.set_volume(self.volume);
        sink.append(monitor);
        sink.pause();

        self.sink = Some(sink);
        log::info!("AUDIO: Loaded from {:.1}s", position_secs);
    }

    /// Clears the shared playing flag once the sink has drained.
    fn poll_end(&mut self, bus: &SystemBus) {
        let finished = self.sink.as_ref().is_some_and(|sink| sink.empty());
        if finished && bus.audio_playing.swap(false, Ordering::Relaxed) {
            log::info!("AUDIO: Track finished");
        }
    }
}

fn open_source(path: &Path) -> Option<Decoder<BufReader<File>>> {
    let Ok(file) = File::open(path) else {
        log::error!("AUDIO: Cannot open file {:?}", path);
        return None;
    };
    match Decoder::new(BufReader::new(file)) {
        Ok(source) => Some(source),
        Err(e) => {
            log::error!("AUDIO: Cannot decode file {:?}: {}", path, e);
            None
        }
    }
}

/// Counts samples as they are pulled by the output stream.
struct AudioMonitor<I> {
    inner: I,
    position_counter: Arc<AtomicU64>,
}

impl<I> Iterator for AudioMonitor<I>
where
    I: Iterator,
{
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.position_counter.fetch_add(1, Ordering::Relaxed);
        }
        item
    }
}

impl<I> Source for AudioMonitor<I>
where
    I: Source,
    I::Item: rodio::Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }
    fn channels(&self) -> u16 {
        self.inner.channels()
    }
    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// Starts the dedicated audio thread.
///
/// Blocks until the output device has been probed so that
/// `SystemBus::audio_device_ready` is settled before any track is loaded.
pub fn start_audio_thread(bus: SystemBus) {
    let (ready_tx, ready_rx) = bounded(1);
    let shared_bus = bus.clone();

    let spawned = thread::Builder::new()
        .name("Audio Thread".to_string())
        .spawn(move || {
            log::info!("AUDIO: Thread started");

            let mut worker = AudioWorker::new(&bus);
            let _ = ready_tx.send(worker.has_device());

            loop {
                match bus.audio_cmd_rx.recv_timeout(END_POLL_INTERVAL) {
                    Ok(cmd) => worker.handle_command(cmd, &bus),
                    Err(RecvTimeoutError::Timeout) => worker.poll_end(&bus),
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            log::info!("AUDIO: Thread stopped");
        });

    let ready = match spawned {
        Ok(_) => ready_rx.recv().unwrap_or(false),
        Err(e) => {
            log::error!("AUDIO: Failed to spawn audio thread ({}), running muted", e);
            false
        }
    };
    shared_bus.audio_device_ready.store(ready, Ordering::Relaxed);
}
