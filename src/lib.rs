//! Gift Hunt - A top-down tile map treasure hunt
//!
//! Core modules:
//! - `sim`: Simulation (map generation, movement, collision, collection)
//! - `input`: Keyboard / d-pad to pressed-direction mapping
//! - `renderer`: State to draw-command list, 2D canvas backend
//! - `scores`: Leaderboard client (submit + fetch)
//! - `settings`: Runtime options from the page URL
//! - `ui`: User-facing messages and DOM glue

pub mod input;
pub mod renderer;
pub mod scores;
pub mod settings;
pub mod sim;
pub mod ui;

pub use scores::{LeaderboardView, ScoreClient};
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Tile edge length in pixels
    pub const TILE: f32 = 32.0;

    /// Map dimensions (tiles)
    pub const MAP_W: i32 = 20;
    pub const MAP_H: i32 = 11;

    /// Player movement speed (pixels per tick)
    pub const PLAYER_SPEED: f32 = 2.2;
    /// Half width/height of the player's collision box
    pub const PLAYER_HALF_EXTENT: f32 = 8.0;
    /// Spawn tile (player starts at its centre)
    pub const SPAWN_TILE: (i32, i32) = (2, 2);

    /// Items requested per map
    pub const ITEM_COUNT: usize = 10;
    /// Random attempts per item before it is dropped
    pub const ITEM_PLACEMENT_TRIES: u32 = 200;
    /// Interior cells forced to trees after the probabilistic fill
    pub const FORCED_OBSTACLES: u32 = 14;

    /// Tile fill probabilities, checked in this order (first match wins)
    pub const ROCK_CHANCE: f32 = 0.05;
    pub const BUSH_CHANCE: f32 = 0.12;
    pub const WATER_CHANCE: f32 = 0.02;

    /// Walk-cycle frame advances when the tick counter exceeds this while moving
    pub const WALK_FRAME_TICKS: u8 = 6;
    /// Idle pose resets when the tick counter exceeds this while standing
    pub const IDLE_RESET_TICKS: u8 = 12;
    /// Walk cycle length
    pub const WALK_FRAMES: u8 = 4;

    /// Items within this Manhattan distance (tiles) can be collected
    pub const PICKUP_RANGE: i32 = 1;

    /// Delay between the last pickup and the score prompt
    pub const SCORE_PROMPT_DELAY_MS: i32 = 1000;
    /// Transient HUD messages clear after this long
    pub const MESSAGE_DURATION_MS: i32 = 3000;
    /// Elapsed-time clock period
    pub const CLOCK_PERIOD_MS: i32 = 1000;
    /// Two touch ends closer than this count as a double tap (zoom suppressed)
    pub const DOUBLE_TAP_MS: f64 = 300.0;
}

/// Tile coordinate containing a pixel position
#[inline]
pub fn pixel_to_tile(pos: Vec2) -> IVec2 {
    (pos / consts::TILE).floor().as_ivec2()
}

/// Pixel position of a tile's centre
#[inline]
pub fn tile_center(tile: IVec2) -> Vec2 {
    tile.as_vec2() * consts::TILE + Vec2::splat(consts::TILE / 2.0)
}

/// Manhattan distance between two tiles
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_tile_floors() {
        assert_eq!(pixel_to_tile(Vec2::new(80.0, 80.0)), IVec2::new(2, 2));
        assert_eq!(pixel_to_tile(Vec2::new(95.9, 64.0)), IVec2::new(2, 2));
        assert_eq!(pixel_to_tile(Vec2::new(96.0, 63.9)), IVec2::new(3, 1));
        assert_eq!(pixel_to_tile(Vec2::new(-0.5, 10.0)), IVec2::new(-1, 0));
    }

    #[test]
    fn test_tile_center_roundtrips() {
        let tile = IVec2::new(7, 4);
        assert_eq!(tile_center(tile), Vec2::new(240.0, 144.0));
        assert_eq!(pixel_to_tile(tile_center(tile)), tile);
    }
}
