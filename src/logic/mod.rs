//! Logic thread module for game state management and updates.
//!
//! This module contains the main game loop that runs at a fixed frame rate
//! and coordinates between input, audio, and the window thread.

pub mod audio;
pub mod audio_thread;

use crate::logic::audio::{AudioDevice, AudioManager};
use crate::models::settings::Settings;
use crate::shared::snapshot::RenderState;
use crate::state::global::{AudioFactory, GlobalState, Launch};
use crate::system::bus::SystemBus;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Upper bound on catch-up steps per loop iteration after a stall.
const MAX_STEPS_PER_TICK: u32 = 10;
/// How long shutdown waits for the window to take the exit notice.
const EXIT_NOTICE_TIMEOUT: Duration = Duration::from_millis(200);

/// Spawns the logic thread that owns the state machine.
///
/// Each iteration:
/// 1. drains pending actions in arrival order
/// 2. drains system events (quit, resize)
/// 3. runs one `update(frame_ms)` per accumulated frame
/// 4. publishes a render snapshot when anything advanced
///
/// Once the state machine closes, `RenderState::Exit` is delivered and the
/// thread ends.
pub fn start_thread(
    bus: SystemBus,
    settings: Settings,
    settings_file: PathBuf,
    launch: Launch,
) -> std::io::Result<JoinHandle<()>> {
    // Blocks until the output device is probed.
    audio_thread::start_audio_thread(bus.clone());

    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");

            let frame_ms = settings.frame_ms();
            let target_dt = Duration::from_secs_f64(frame_ms / 1000.0);
            let audio_bus = bus.clone();
            let audio_factory: AudioFactory =
                Box::new(move || Box::new(AudioManager::new(&audio_bus)) as Box<dyn AudioDevice>);
            let mut state =
                GlobalState::new(launch, settings, bus.input_cmd_tx.clone(), audio_factory)
                    .with_settings_file(settings_file);

            let mut accumulator = Duration::ZERO;
            let mut last_time = Instant::now();

            while !state.is_closed() {
                while let Ok(action) = bus.action_rx.try_recv() {
                    state.handle_action(action);
                }
                while let Ok(event) = bus.sys_rx.try_recv() {
                    state.handle_system(event);
                }
                if state.is_closed() {
                    break;
                }

                let now = Instant::now();
                accumulator += now - last_time;
                last_time = now;

                let mut steps = 0;
                while accumulator >= target_dt && steps < MAX_STEPS_PER_TICK {
                    state.update(frame_ms);
                    accumulator -= target_dt;
                    steps += 1;
                }
                if steps == MAX_STEPS_PER_TICK {
                    // Drop the backlog instead of fast-forwarding the chart.
                    accumulator = Duration::ZERO;
                }

                if steps > 0 {
                    // The window keeps only the latest snapshots; a full
                    // channel just means it is behind.
                    let _ = bus.render_tx.try_send(state.create_snapshot());
                } else {
                    thread::sleep(Duration::from_millis(1));
                }
            }

            // The window may already be gone with a full channel.
            if let Err(e) = bus.render_tx.send_timeout(RenderState::Exit, EXIT_NOTICE_TIMEOUT) {
                log::warn!("LOGIC: Window already gone: {}", e);
            }
            log::info!("LOGIC: Thread stopped");
        })
}
