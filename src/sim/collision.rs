//! Collision detection and response against the tile grid
//!
//! The player is an axis-aligned box (±PLAYER_HALF_EXTENT around its centre).
//! Movement resolves one axis at a time so the player slides along walls
//! instead of sticking to them.

use glam::{IVec2, Vec2};

use super::map::TileMap;
use crate::consts::PLAYER_HALF_EXTENT;
use crate::pixel_to_tile;

/// Result of a sliding move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Resolved position
    pub pos: Vec2,
    /// Horizontal component was rejected
    pub blocked_x: bool,
    /// Vertical component was rejected
    pub blocked_y: bool,
}

/// Whether the player may occupy a tile (outside the map is never passable)
pub fn is_passable(map: &TileMap, tile: IVec2) -> bool {
    map.at(tile).is_some_and(|t| t.is_passable())
}

/// Corners of the player box centred at `center`
pub fn box_corners(center: Vec2) -> [Vec2; 4] {
    let h = PLAYER_HALF_EXTENT;
    [
        center + Vec2::new(-h, -h),
        center + Vec2::new(h, -h),
        center + Vec2::new(-h, h),
        center + Vec2::new(h, h),
    ]
}

/// Whether the player box centred at `center` touches only passable tiles
///
/// The box is smaller than a tile, so its four corners cover every tile it
/// can overlap.
pub fn box_is_clear(map: &TileMap, center: Vec2) -> bool {
    box_corners(center)
        .iter()
        .all(|&corner| is_passable(map, pixel_to_tile(corner)))
}

/// Move `pos` by `vel`, X axis first, then Y from the resolved X
pub fn try_move(map: &TileMap, pos: Vec2, vel: Vec2) -> MoveResult {
    let mut result = MoveResult {
        pos,
        blocked_x: false,
        blocked_y: false,
    };

    if vel.x != 0.0 {
        let candidate = Vec2::new(result.pos.x + vel.x, result.pos.y);
        if box_is_clear(map, candidate) {
            result.pos = candidate;
        } else {
            result.blocked_x = true;
        }
    }

    if vel.y != 0.0 {
        let candidate = Vec2::new(result.pos.x, result.pos.y + vel.y);
        if box_is_clear(map, candidate) {
            result.pos = candidate;
        } else {
            result.blocked_y = true;
        }
    }

    result
}
