//! Application window and event loop handler.
//!
//! This module manages the main window and bridges winit events to the
//! game's internal event system. Keys go to the input thread; pointer and
//! wheel events become `GameAction`s directly. The latest snapshot is shown
//! in the window title.

use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, PhysicalPosition};
use winit::error::EventLoopError;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use crate::input::events::{GameAction, Modifiers, PointerButton, RawInputEvent};
use crate::shared::snapshot::RenderState;
use crate::system::bus::{SystemBus, SystemEvent};

/// How often the window polls for new snapshots.
const POLL_INTERVAL: Duration = Duration::from_millis(8);
/// Pixel deltas (touchpads) per wheel notch.
const PIXELS_PER_NOTCH: f64 = 40.0;

/// Main application struct handling window events.
pub struct App {
    bus: SystemBus,
    size: (u32, u32),
    window: Option<Arc<Window>>,
    modifiers: ModifiersState,
    cursor: (f64, f64),
    title: String,
}

impl App {
    pub fn new(bus: SystemBus, width: u32, height: u32) -> Self {
        Self {
            bus,
            size: (width, height),
            window: None,
            modifiers: ModifiersState::empty(),
            cursor: (0.0, 0.0),
            title: String::new(),
        }
    }

    /// Runs the application event loop (blocking).
    pub fn run(bus: SystemBus, width: u32, height: u32) -> Result<(), EventLoopError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));

        let mut app = App::new(bus, width, height);
        event_loop.run_app(&mut app)
    }

    fn send_action(&self, action: GameAction) {
        if let Err(e) = self.bus.action_tx.send(action) {
            log::error!("RENDER: Logic thread unreachable: {}", e);
        }
    }

    fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.modifiers.control_key(),
            shift: self.modifiers.shift_key(),
        }
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> (f64, f64) {
        let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        let logical: LogicalPosition<f64> = position.to_logical(scale);
        (logical.x, logical.y)
    }

    /// Applies every pending snapshot. Returns false once the logic thread
    /// has asked the window to close.
    fn drain_snapshots(&mut self) -> bool {
        let mut latest = None;
        for state in self.bus.render_rx.try_iter() {
            if matches!(state, RenderState::Exit) {
                return false;
            }
            latest = Some(state);
        }

        if let Some(state) = latest {
            let title = state.summary();
            if title != self.title {
                if let Some(window) = &self.window {
                    window.set_title(&title);
                }
                self.title = title;
            }
        }
        true
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        log::info!("RENDER: Creating window...");
        let attributes = Window::default_attributes()
            .with_title("tapline")
            .with_inner_size(winit::dpi::LogicalSize::new(self.size.0, self.size.1));

        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                log::error!("RENDER: Cannot create window: {}", e);
                let _ = self.bus.sys_tx.send(SystemEvent::Quit);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { .. } => {
                if let Some(raw_event) = RawInputEvent::from_winit(&event)
                    && let Err(e) = self.bus.raw_input_tx.send(raw_event)
                {
                    log::error!("RENDER: Input thread unreachable: {}", e);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.to_logical(position);
                self.cursor = (x, y);
                self.send_action(GameAction::PointerMoved { x, y });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Left,
                    MouseButton::Right => PointerButton::Right,
                    _ => return,
                };
                let (x, y) = self.cursor;
                let action = match state {
                    ElementState::Pressed => GameAction::PointerPressed { button, x, y },
                    ElementState::Released => GameAction::PointerReleased {
                        button,
                        x,
                        y,
                        modifiers: self.modifiers(),
                    },
                };
                self.send_action(action);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y as f64,
                    MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_NOTCH,
                };
                if notches != 0.0 {
                    self.send_action(GameAction::Wheel { notches });
                }
            }
            WindowEvent::Focused(focused) => {
                let event = if focused {
                    SystemEvent::FocusGained
                } else {
                    SystemEvent::FocusLost
                };
                let _ = self.bus.sys_tx.send(event);
            }
            WindowEvent::Resized(size) => {
                let _ = self.bus.sys_tx.send(SystemEvent::Resize {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::CloseRequested => {
                log::info!("RENDER: Close requested");
                let _ = self.bus.sys_tx.send(SystemEvent::Quit);
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.drain_snapshots() {
            log::info!("RENDER: Logic thread finished, closing window");
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }
}
