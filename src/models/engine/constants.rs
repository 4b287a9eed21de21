//! Gameplay and editing constants shared by the session and the editor.

/// Default number of lanes (S D J K).
pub const DEFAULT_LANE_COUNT: usize = 4;

/// Default frame rate of the fixed-step loop.
pub const DEFAULT_FPS: u32 = 60;

/// Length of the pre-song countdown (ms).
pub const COUNTDOWN_MS: u32 = 3000;

/// Fallback tempo for new or unreadable charts.
pub const DEFAULT_BPM: f64 = 120.0;
/// Fallback scroll speed (px per frame) for new or unreadable charts.
pub const DEFAULT_SCROLL_SPEED: f64 = 7.0;

/// Lowest tempo a debug-menu edit can reach.
pub const MIN_BPM: f64 = 1.0;
/// Lowest scroll speed a debug-menu edit can reach.
pub const MIN_SCROLL_SPEED: f64 = 0.1;

/// Placement ignores a note closer than this to an existing one in the same lane.
pub const DEDUP_TOLERANCE_MS: i64 = 10;
/// Right-click removal radius.
pub const REMOVE_TOLERANCE_MS: i64 = 20;
/// Holds must be strictly longer than this.
pub const MIN_HOLD_DURATION_MS: i64 = 50;

/// Score awarded per millisecond a hold is kept down.
pub const HOLD_SCORE_PER_MS: f64 = 0.2;

/// Frames a lane receptor stays lit after a key press.
pub const KEY_FEEDBACK_FRAMES: u32 = 10;
/// Frames the judgement banner stays on screen.
pub const JUDGEMENT_DISPLAY_FRAMES: u32 = 30;

/// Snap divisors selectable in the editor.
pub const SNAP_DIVISORS: [u32; 4] = [1, 2, 4, 8];
