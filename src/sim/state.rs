//! Game state and core simulation types
//!
//! One `GameState` is one session: map generation through score submission.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::items::{Item, ItemKind, place_items};
use super::map::{TileMap, generate_map};
use crate::consts::*;
use crate::{pixel_to_tile, tile_center};

/// Direction the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Centre of the collision box (pixels)
    pub pos: Vec2,
    /// Velocity applied this step (pixels per tick)
    pub vel: Vec2,
    pub facing: Facing,
    /// Walk-cycle frame (0..WALK_FRAMES)
    pub anim_frame: u8,
    /// Sub-frame tick counter
    pub anim_tick: u8,
    pub moving: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: Facing::Down,
            anim_frame: 0,
            anim_tick: 0,
            moving: false,
        }
    }

    /// Tile containing the player's centre
    pub fn tile(&self) -> IVec2 {
        pixel_to_tile(self.pos)
    }
}

/// Something the UI needs to react to, queued by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The collectable item changed (`None` = nothing in range)
    NearItemChanged(Option<usize>),
    /// An item went into the inventory
    ItemCollected { index: usize, kind: ItemKind },
    /// Every placed item has been found
    Completed { elapsed_secs: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Map seed for reproducibility
    pub seed: u64,
    pub map: TileMap,
    /// Placed items (index = placement order)
    pub items: Vec<Item>,
    pub player: Player,
    /// Index of the item currently in pickup range
    pub near_item: Option<usize>,
    pub found_count: usize,
    /// Seconds on the play clock
    pub elapsed_secs: u32,
    pub clock_running: bool,
    /// Set once, when the last item is collected
    pub completed: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events for the driver (drain each frame)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Generate a standard-size session from a seed
    pub fn new(seed: u64) -> Self {
        Self::with_size(seed, MAP_W, MAP_H, ITEM_COUNT)
    }

    /// Generate a session with custom map size and item count
    pub fn with_size(seed: u64, width: i32, height: i32, item_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let map = generate_map(width, height, &mut rng);
        let items = place_items(&map, item_count, &mut rng);
        Self::from_parts(seed, map, items)
    }

    /// Assemble a session from an existing map and items
    pub fn from_parts(seed: u64, map: TileMap, items: Vec<Item>) -> Self {
        let spawn = IVec2::new(SPAWN_TILE.0, SPAWN_TILE.1);
        Self {
            seed,
            map,
            items,
            player: Player::new(tile_center(spawn)),
            near_item: None,
            found_count: 0,
            elapsed_secs: 0,
            clock_running: true,
            completed: false,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Number of items actually placed (the target for completion)
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
