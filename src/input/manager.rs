use super::events::{Direction, GameAction, InputContext, RawInputEvent};
use super::keycode::parse_keycode;
use std::collections::HashMap;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Resolves raw key events into actions for the active context.
pub struct InputManager {
    context: InputContext,
    lane_bindings: HashMap<KeyCode, usize>,
    editor_bindings: HashMap<KeyCode, GameAction>,
    ctrl_left: bool,
    ctrl_right: bool,
    shift_left: bool,
    shift_right: bool,
}

impl InputManager {
    pub fn new(keybinds: &[String]) -> Self {
        let mut manager = Self {
            context: InputContext::Gameplay,
            lane_bindings: HashMap::new(),
            editor_bindings: HashMap::new(),
            ctrl_left: false,
            ctrl_right: false,
            shift_left: false,
            shift_right: false,
        };
        manager.load_default_bindings();
        manager.reload_keybinds(keybinds);
        manager
    }

    pub fn set_context(&mut self, context: InputContext) {
        if self.context != context {
            log::info!("INPUT: Switching to {:?} bindings", context);
            self.context = context;
        }
    }

    fn ctrl(&self) -> bool {
        self.ctrl_left || self.ctrl_right
    }

    fn shift(&self) -> bool {
        self.shift_left || self.shift_right
    }

    pub fn process(&mut self, event: RawInputEvent) -> Option<GameAction> {
        let pressed = event.state == ElementState::Pressed;
        match event.keycode {
            KeyCode::ControlLeft => {
                self.ctrl_left = pressed;
                return None;
            }
            KeyCode::ControlRight => {
                self.ctrl_right = pressed;
                return None;
            }
            KeyCode::ShiftLeft => {
                self.shift_left = pressed;
                return None;
            }
            KeyCode::ShiftRight => {
                self.shift_right = pressed;
                return None;
            }
            _ => {}
        }

        match self.context {
            InputContext::Gameplay => self.process_gameplay(event.keycode, pressed),
            InputContext::Editor => self.process_editor(event.keycode, pressed),
        }
    }

    fn process_gameplay(&self, keycode: KeyCode, pressed: bool) -> Option<GameAction> {
        if let Some(&lane) = self.lane_bindings.get(&keycode) {
            return Some(if pressed {
                GameAction::Hit { lane }
            } else {
                GameAction::Release { lane }
            });
        }
        match (pressed, keycode) {
            (true, KeyCode::Escape) => Some(GameAction::Back),
            (true, KeyCode::Enter) => Some(GameAction::Confirm),
            _ => None,
        }
    }

    fn process_editor(&self, keycode: KeyCode, pressed: bool) -> Option<GameAction> {
        let direction = match keycode {
            KeyCode::ArrowUp => Some(Direction::Up),
            KeyCode::ArrowDown => Some(Direction::Down),
            KeyCode::ArrowLeft => Some(Direction::Left),
            KeyCode::ArrowRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(direction) = direction {
            return Some(GameAction::Navigate {
                direction,
                pressed,
                big_step: self.shift(),
            });
        }

        if !pressed {
            return None;
        }

        if self.ctrl() {
            match keycode {
                KeyCode::KeyC => return Some(GameAction::CopySelection),
                KeyCode::KeyV => return Some(GameAction::PasteSelection),
                _ => {}
            }
        }

        self.editor_bindings.get(&keycode).cloned()
    }

    /// Rebinds the lane keys; unknown labels keep their previous binding.
    pub fn reload_keybinds(&mut self, keybinds: &[String]) {
        let parsed: Vec<(usize, KeyCode)> = keybinds
            .iter()
            .enumerate()
            .filter_map(|(lane, label)| match parse_keycode(label) {
                Some(code) => Some((lane, code)),
                None => {
                    log::warn!("INPUT: Unknown key label '{}' for lane {}", label, lane);
                    None
                }
            })
            .collect();

        if parsed.is_empty() {
            return;
        }

        let rebound: Vec<usize> = parsed.iter().map(|(lane, _)| *lane).collect();
        self.lane_bindings.retain(|_, lane| !rebound.contains(lane));
        for (lane, code) in parsed {
            self.lane_bindings.insert(code, lane);
        }
    }

    fn load_default_bindings(&mut self) {
        // Gameplay 4K
        self.lane_bindings.insert(KeyCode::KeyS, 0);
        self.lane_bindings.insert(KeyCode::KeyD, 1);
        self.lane_bindings.insert(KeyCode::KeyJ, 2);
        self.lane_bindings.insert(KeyCode::KeyK, 3);

        // Editor
        let editor = [
            (KeyCode::Escape, GameAction::Back),
            (KeyCode::Enter, GameAction::Confirm),
            (KeyCode::Digit7, GameAction::ToggleDebugMenu),
            (KeyCode::KeyP, GameAction::TogglePlayback),
            (KeyCode::KeyR, GameAction::Rewind),
            (KeyCode::KeyE, GameAction::JumpToEnd),
            (KeyCode::KeyS, GameAction::SetCustomStart),
            (KeyCode::Delete, GameAction::DeleteSelection),
            (KeyCode::Backspace, GameAction::DeleteSelection),
            (KeyCode::Digit1, GameAction::SetSnap(1)),
            (KeyCode::Digit2, GameAction::SetSnap(2)),
            (KeyCode::Digit4, GameAction::SetSnap(4)),
            (KeyCode::Digit8, GameAction::SetSnap(8)),
        ];
        self.editor_bindings.extend(editor);
    }
}
