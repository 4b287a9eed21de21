use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy)]
pub struct RawInputEvent {
    pub keycode: KeyCode,
    pub state: ElementState,
}

impl RawInputEvent {
    pub fn from_winit(event: &WindowEvent) -> Option<Self> {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(keycode),
                    state,
                    repeat: false,
                    ..
                },
            ..
        } = event
        {
            Some(Self {
                keycode: *keycode,
                state: *state,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

/// Keyboard modifiers captured with a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    // Gameplay
    Hit { lane: usize },
    Release { lane: usize },

    // System / UI
    Back,
    Confirm,
    /// Arrow keys; `pressed` is false on release so held keys can scroll.
    Navigate {
        direction: Direction,
        pressed: bool,
        big_step: bool,
    },

    // Pointer, in logical pixels
    PointerMoved { x: f64, y: f64 },
    PointerPressed {
        button: PointerButton,
        x: f64,
        y: f64,
    },
    PointerReleased {
        button: PointerButton,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    /// Wheel notches; positive scrolls towards the start of the song.
    Wheel { notches: f64 },

    // Editor
    ToggleDebugMenu,
    TogglePlayback,
    Rewind,
    JumpToEnd,
    SetCustomStart,
    SetSnap(u32),
    CopySelection,
    PasteSelection,
    DeleteSelection,
}

/// Which set of key bindings the input thread resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    Gameplay,
    Editor,
}

#[derive(Debug, Clone)]
pub enum InputCommand {
    /// One key label per lane.
    ReloadKeybinds(Vec<String>),
    SetContext(InputContext),
}
