//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - Seeded RNG only (same seed, same map)
//! - Stable iteration order (items by placement index)
//! - Per-frame step, no wall-clock reads

pub mod collision;
pub mod items;
pub mod map;
pub mod state;
pub mod tick;

pub use collision::{box_is_clear, is_passable, try_move};
pub use items::{Item, ItemKind, place_items};
pub use map::{Tile, TileMap, generate_map};
pub use state::{Facing, GameEvent, GameState, Player};
pub use tick::{TickInput, collect, tick, tick_clock};
