//! Action handling for `EditorState`.

use super::placement::{self, HoldGesture};
use super::selection::{self, Rect};
use super::{DRAG_THRESHOLD_PX, EditorRequest, EditorState, WHEEL_STEP_MS};
use crate::input::events::{Direction, GameAction, Modifiers, PointerButton};
use crate::models::engine::constants::SNAP_DIVISORS;
use crate::state::traits::{HandleAction, Transition};

impl EditorState {
    fn lane_at(&self, x: f64) -> Option<usize> {
        self.layout.lane_at(self.layout.editor_start_x(), x)
    }

    fn handle_menu_action(&mut self, action: &GameAction) -> Transition {
        match *action {
            GameAction::Navigate {
                direction,
                pressed: true,
                big_step,
            } => match direction {
                Direction::Up => self.menu.move_cursor(false),
                Direction::Down => self.menu.move_cursor(true),
                Direction::Left | Direction::Right => {
                    let timing = &mut self.song.chart.timing;
                    if self.menu.adjust(timing, direction == Direction::Right, big_step) {
                        self.refresh_scale();
                    }
                }
            },
            GameAction::Confirm => {
                let request = self.menu.activate(&mut self.song.chart.timing);
                self.refresh_scale();
                if let Some(request) = request {
                    return Transition::Editor(request);
                }
            }
            GameAction::Back | GameAction::ToggleDebugMenu => self.menu.close(),
            _ => {}
        }
        Transition::None
    }

    fn on_left_release(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        let Some(start) = self.drag_start.take() else {
            return;
        };
        let marquee = Rect::from_corners(start, (x, y));
        if marquee.width() > DRAG_THRESHOLD_PX || marquee.height() > DRAG_THRESHOLD_PX {
            let timeline = self.timeline();
            let hits = self.selection.apply_marquee(
                &self.song.chart,
                marquee,
                &self.layout,
                &timeline,
                modifiers.ctrl,
            );
            log::debug!("EDITOR: Marquee hit {} notes", hits);
            return;
        }

        if !(modifiers.shift || modifiers.ctrl) {
            self.selection.clear();
        }
        let Some(lane) = self.lane_at(x) else {
            return;
        };
        let time = self.timeline().time_at(y);
        if modifiers.shift {
            match self.pending_holds.click(&mut self.song.chart, lane, time) {
                HoldGesture::Started => self.set_status(format!("Hold start at {time}ms")),
                HoldGesture::Placed => self.set_status("Hold placed"),
                HoldGesture::Discarded => self.set_status("Hold discarded"),
            }
        } else {
            placement::place_tap(&mut self.song.chart, lane, time);
        }
    }

    fn on_right_release(&mut self, x: f64, y: f64) {
        if let Some(lane) = self.lane_at(x) {
            let time = self.timeline().time_at(y);
            if placement::remove_note(&mut self.song.chart, lane, time) > 0 {
                self.selection.retain_existing(&self.song.chart);
            }
        }
    }

    fn copy_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.clipboard = self.selection.copy(&self.song.chart);
        self.set_status(format!("Copied {} notes", self.clipboard.len()));
    }

    fn paste_clipboard(&mut self) {
        if self.clipboard.is_empty() {
            return;
        }
        let at = self.timeline().time_at(self.pointer.1);
        let pasted = selection::paste(
            &mut self.song.chart,
            &self.clipboard,
            at,
            self.layout.lane_count,
        );
        self.set_status(format!("Pasted {pasted} notes"));
    }

    fn delete_selection(&mut self) {
        let removed = self.selection.delete_selected(&mut self.song.chart);
        if removed > 0 {
            self.set_status(format!("Deleted {removed} notes"));
        }
    }
}

impl HandleAction for EditorState {
    fn handle_action(&mut self, action: &GameAction) -> Transition {
        if *action == GameAction::ToggleDebugMenu && !self.menu.is_visible() {
            self.menu.toggle();
            self.drag_start = None;
            self.scroll_up = false;
            self.scroll_down = false;
            return Transition::None;
        }
        if self.menu.is_visible() {
            return self.handle_menu_action(action);
        }

        match *action {
            GameAction::Back => {
                if !self.pending_holds.is_empty() {
                    self.pending_holds.cancel_all();
                    self.set_status("Hold cancelled");
                } else {
                    self.stop_playback();
                    return Transition::Editor(EditorRequest::Exit);
                }
            }
            GameAction::TogglePlayback => self.toggle_playback(),
            GameAction::Rewind => self.rewind(),
            GameAction::JumpToEnd if !self.playback.playing => {
                if let Some(last) = self.song.chart.last_time() {
                    self.scroll_ms = last as f64;
                }
            }
            GameAction::SetCustomStart if self.song.chart.timing.use_custom_start => {
                self.song
                    .chart
                    .timing
                    .set_start_offset_ms(self.scroll_ms.round() as i64);
                let start = self.song.chart.timing.start_offset_ms();
                self.set_status(format!("Start time {start}ms"));
            }
            GameAction::SetSnap(divisor) if SNAP_DIVISORS.contains(&divisor) => {
                self.snap = divisor;
            }
            GameAction::CopySelection => self.copy_selection(),
            GameAction::PasteSelection => self.paste_clipboard(),
            GameAction::DeleteSelection => self.delete_selection(),
            GameAction::Navigate {
                direction, pressed, ..
            } => match direction {
                Direction::Up => self.scroll_up = pressed && !self.playback.playing,
                Direction::Down => self.scroll_down = pressed && !self.playback.playing,
                Direction::Left | Direction::Right => {}
            },
            GameAction::Wheel { notches } if !self.playback.playing => {
                self.scroll_by(-notches * WHEEL_STEP_MS);
            }
            GameAction::PointerMoved { x, y } => self.pointer = (x, y),
            GameAction::PointerPressed { button, x, y } => {
                self.pointer = (x, y);
                if button == PointerButton::Left {
                    self.drag_start = Some((x, y));
                }
            }
            GameAction::PointerReleased {
                button,
                x,
                y,
                modifiers,
            } => {
                self.pointer = (x, y);
                match button {
                    PointerButton::Left => self.on_left_release(x, y, modifiers),
                    PointerButton::Right => self.on_right_release(x, y),
                }
            }
            _ => {}
        }
        Transition::None
    }
}
