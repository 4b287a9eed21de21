//! Window thread: the winit event loop and snapshot presentation.

pub mod app;
