pub mod constants;
pub mod hit_window;
pub mod note;
pub mod playfield;
pub mod timing;

pub use hit_window::HitWindows;
pub use note::{ActiveNote, NoteVisual};
pub use playfield::PlayfieldLayout;
pub use timing::TimingModel;
