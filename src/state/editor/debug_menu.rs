//! In-editor menu for chart timing fields and chart actions.

use crate::models::chart::ChartTiming;
use crate::shared::snapshot::MenuRow;
use crate::state::editor::EditorRequest;

/// Typed binding of one menu row to a `ChartTiming` field.
#[derive(Clone, Copy)]
pub enum MenuField {
    Float {
        get: fn(&ChartTiming) -> f64,
        set: fn(&mut ChartTiming, f64),
        step: f64,
        big_step: f64,
    },
    Int {
        get: fn(&ChartTiming) -> i64,
        set: fn(&mut ChartTiming, i64),
        step: i64,
        big_step: i64,
    },
    Bool {
        get: fn(&ChartTiming) -> bool,
        set: fn(&mut ChartTiming, bool),
    },
    Action(EditorRequest),
}

#[derive(Clone, Copy)]
pub struct MenuItem {
    pub label: &'static str,
    pub field: MenuField,
}

impl MenuItem {
    fn value(&self, timing: &ChartTiming) -> String {
        match self.field {
            MenuField::Float { get, .. } => format!("{:.2}", get(timing)),
            MenuField::Int { get, .. } => get(timing).to_string(),
            MenuField::Bool { get, .. } => if get(timing) { "On" } else { "Off" }.to_string(),
            MenuField::Action(_) => String::new(),
        }
    }
}

fn items() -> Vec<MenuItem> {
    vec![
        MenuItem {
            label: "BPM",
            field: MenuField::Float {
                get: ChartTiming::bpm,
                set: ChartTiming::set_bpm,
                step: 0.5,
                big_step: 5.0,
            },
        },
        MenuItem {
            label: "Note Speed",
            field: MenuField::Float {
                get: ChartTiming::scroll_speed,
                set: ChartTiming::set_scroll_speed,
                step: 0.1,
                big_step: 1.0,
            },
        },
        MenuItem {
            label: "Custom Start",
            field: MenuField::Bool {
                get: |t| t.use_custom_start,
                set: |t, v| t.use_custom_start = v,
            },
        },
        MenuItem {
            label: "Start Time (ms)",
            field: MenuField::Int {
                get: ChartTiming::start_offset_ms,
                set: ChartTiming::set_start_offset_ms,
                step: 100,
                big_step: 1000,
            },
        },
        MenuItem {
            label: "Save Chart",
            field: MenuField::Action(EditorRequest::Save),
        },
        MenuItem {
            label: "Reload Chart",
            field: MenuField::Action(EditorRequest::Reload),
        },
        MenuItem {
            label: "Playtest",
            field: MenuField::Action(EditorRequest::Playtest),
        },
    ]
}

/// Menu visibility and cursor.
pub struct DebugMenu {
    items: Vec<MenuItem>,
    selected: usize,
    visible: bool,
}

impl DebugMenu {
    pub fn new() -> Self {
        Self {
            items: items(),
            selected: 0,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Moves the cursor, wrapping around.
    pub fn move_cursor(&mut self, down: bool) {
        let len = self.items.len();
        self.selected = if down {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }

    /// Steps the selected value. Returns whether anything changed.
    pub fn adjust(&mut self, timing: &mut ChartTiming, increase: bool, big_step: bool) -> bool {
        let sign = if increase { 1.0 } else { -1.0 };
        match self.items[self.selected].field {
            MenuField::Float {
                get,
                set,
                step,
                big_step: big,
            } => {
                let delta = if big_step { big } else { step };
                set(timing, get(timing) + sign * delta);
                true
            }
            MenuField::Int {
                get,
                set,
                step,
                big_step: big,
            } => {
                let delta = if big_step { big } else { step };
                set(timing, get(timing) + sign as i64 * delta);
                true
            }
            MenuField::Bool { get, set } => {
                set(timing, !get(timing));
                true
            }
            MenuField::Action(_) => false,
        }
    }

    /// Confirms the selected row: actions produce a request, booleans flip.
    pub fn activate(&mut self, timing: &mut ChartTiming) -> Option<EditorRequest> {
        match self.items[self.selected].field {
            MenuField::Action(request) => Some(request),
            MenuField::Bool { get, set } => {
                set(timing, !get(timing));
                None
            }
            _ => None,
        }
    }

    pub fn rows(&self, timing: &ChartTiming) -> Vec<MenuRow> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| MenuRow {
                label: item.label,
                value: item.value(timing),
                selected: i == self.selected,
            })
            .collect()
    }
}

impl Default for DebugMenu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpm_steps_and_clamps() {
        let mut menu = DebugMenu::new();
        let mut timing = ChartTiming::default();
        menu.adjust(&mut timing, true, false);
        assert_eq!(timing.bpm(), 120.5);
        menu.adjust(&mut timing, false, true);
        assert_eq!(timing.bpm(), 115.5);
        for _ in 0..40 {
            menu.adjust(&mut timing, false, true);
        }
        assert_eq!(timing.bpm(), 1.0);
    }

    #[test]
    fn start_time_never_goes_negative() {
        let mut menu = DebugMenu::new();
        let mut timing = ChartTiming::default();
        for _ in 0..3 {
            menu.move_cursor(true);
        }
        assert_eq!(menu.rows(&timing)[3].label, "Start Time (ms)");
        menu.adjust(&mut timing, true, true);
        menu.adjust(&mut timing, true, false);
        assert_eq!(timing.start_offset_ms(), 1100);
        menu.adjust(&mut timing, false, true);
        menu.adjust(&mut timing, false, true);
        assert_eq!(timing.start_offset_ms(), 0);
    }

    #[test]
    fn speed_has_a_floor() {
        let mut menu = DebugMenu::new();
        let mut timing = ChartTiming::new(120.0, 0.5);
        menu.move_cursor(true);
        menu.adjust(&mut timing, false, true);
        assert_eq!(timing.scroll_speed(), 0.1);
    }

    #[test]
    fn cursor_wraps_and_actions_emit_requests() {
        let mut menu = DebugMenu::new();
        let mut timing = ChartTiming::default();
        menu.move_cursor(false);
        assert_eq!(menu.selected, 6);
        assert_eq!(menu.activate(&mut timing), Some(EditorRequest::Playtest));
        assert!(!menu.adjust(&mut timing, true, false));
        menu.move_cursor(true);
        assert_eq!(menu.selected, 0);
        assert_eq!(menu.activate(&mut timing), None);
    }

    #[test]
    fn bool_rows_toggle() {
        let mut menu = DebugMenu::new();
        let mut timing = ChartTiming::default();
        menu.move_cursor(true);
        menu.move_cursor(true);
        menu.adjust(&mut timing, false, false);
        assert!(timing.use_custom_start);
        menu.activate(&mut timing);
        assert!(!timing.use_custom_start);
        assert_eq!(menu.rows(&timing)[2].value, "Off");
    }
}
