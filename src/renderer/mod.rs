//! Rendering module
//!
//! `shapes` turns game state into a list of draw commands; the canvas
//! backend (browser only) replays that list with the 2D canvas API.

pub mod draw;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use draw::{Color, DrawCmd};
pub use shapes::build_frame;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
