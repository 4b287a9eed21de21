//! Action handling for `GameSession`.
//!
//! Lane presses are queued and judged on the next frame, after the clock
//! has advanced, in arrival order.

use super::{GameSession, LaneInput, SessionPhase};
use crate::input::events::GameAction;
use crate::state::traits::{HandleAction, Transition};

impl GameSession {
    fn accepts_lane_input(&self, lane: usize) -> bool {
        lane < self.layout.lane_count
            && matches!(self.phase, SessionPhase::Countdown | SessionPhase::Playing)
    }
}

impl HandleAction for GameSession {
    fn handle_action(&mut self, action: &GameAction) -> Transition {
        match *action {
            GameAction::Hit { lane } => {
                if self.accepts_lane_input(lane) {
                    self.pending_input.push_back(LaneInput::Down(lane));
                }
                Transition::None
            }
            GameAction::Release { lane } => {
                if self.accepts_lane_input(lane) {
                    self.pending_input.push_back(LaneInput::Up(lane));
                }
                Transition::None
            }
            GameAction::Confirm if self.phase == SessionPhase::EndScreen => {
                Transition::LeaveGame(self.result.clone())
            }
            GameAction::Back => match self.phase {
                SessionPhase::EndScreen => Transition::LeaveGame(self.result.clone()),
                _ => {
                    self.abort();
                    Transition::LeaveGame(None)
                }
            },
            _ => Transition::None,
        }
    }
}
