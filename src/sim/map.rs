//! Tile grid and map generation

use std::fmt;

use glam::IVec2;
use rand::Rng;

use crate::consts::*;

/// Terrain of one grid cell, with its stable integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Ground = 0,
    Tree = 1,
    Rock = 2,
    /// Decorative, walkable
    Bush = 3,
    /// Reserved; walkable, never generated
    Snow = 4,
    Water = 5,
}

impl Tile {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Ground),
            1 => Some(Tile::Tree),
            2 => Some(Tile::Rock),
            3 => Some(Tile::Bush),
            4 => Some(Tile::Snow),
            5 => Some(Tile::Water),
            _ => None,
        }
    }

    /// Whether the player may stand on this tile
    pub fn is_passable(self) -> bool {
        !matches!(self, Tile::Tree | Tile::Rock | Tile::Water)
    }

    /// Whether an item may be hidden on this tile
    ///
    /// Trees and rocks qualify: items are picked up from an adjacent tile.
    pub fn can_hide_item(self) -> bool {
        matches!(self, Tile::Tree | Tile::Rock | Tile::Bush)
    }

    fn ascii(self) -> char {
        match self {
            Tile::Ground => '.',
            Tile::Tree => 'T',
            Tile::Rock => 'o',
            Tile::Bush => '"',
            Tile::Snow => '*',
            Tile::Water => '~',
        }
    }
}

/// Fixed-size rectangular tile grid (row-major)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create a map filled with a single tile
    pub fn filled(width: i32, height: i32, tile: Tile) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![tile; (width * height) as usize],
        }
    }

    /// Build from rows of tile codes (unknown codes become ground)
    pub fn from_codes(rows: &[&[u8]]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as i32;
        let mut map = Self::filled(width, height, Tile::Ground);
        for (y, row) in rows.iter().enumerate() {
            for (x, &code) in row.iter().enumerate().take(width as usize) {
                map.set(x as i32, y as i32, Tile::from_code(code).unwrap_or_default());
            }
        }
        map
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn is_border(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Tile at (x, y), `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        if self.in_bounds(x, y) {
            Some(self.tiles[self.idx(x, y)])
        } else {
            None
        }
    }

    pub fn at(&self, tile: IVec2) -> Option<Tile> {
        self.get(tile.x, tile.y)
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let idx = self.idx(x, y);
            self.tiles[idx] = tile;
        }
    }

    /// Iterate `(x, y, tile)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        self.tiles.iter().enumerate().map(move |(i, &t)| {
            let i = i as i32;
            (i % self.width, i / self.width, t)
        })
    }

    fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }
}

impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let tile = self.tiles[self.idx(x, y)];
                write!(f, "{}", tile.ascii())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Roll one interior cell.
///
/// Each check draws its own number and the first match wins, so a cell is a
/// rock with p=0.05, a bush with p=0.95*0.12, water with p=0.95*0.88*0.02.
fn roll_interior<R: Rng>(rng: &mut R) -> Tile {
    if rng.random::<f32>() < ROCK_CHANCE {
        Tile::Rock
    } else if rng.random::<f32>() < BUSH_CHANCE {
        Tile::Bush
    } else if rng.random::<f32>() < WATER_CHANCE {
        Tile::Water
    } else {
        Tile::Ground
    }
}

/// Generate a map: tree border, random interior, forced trees, clear spawn
pub fn generate_map<R: Rng>(width: i32, height: i32, rng: &mut R) -> TileMap {
    let mut map = TileMap::filled(width, height, Tile::Ground);

    for y in 0..map.height {
        for x in 0..map.width {
            let tile = if map.is_border(x, y) {
                Tile::Tree
            } else {
                roll_interior(rng)
            };
            map.set(x, y, tile);
        }
    }

    // Forced trees keep clear of the border ring and the ring inside it
    if map.width > 4 && map.height > 4 {
        for _ in 0..FORCED_OBSTACLES {
            let x = rng.random_range(2..map.width - 2);
            let y = rng.random_range(2..map.height - 2);
            map.set(x, y, Tile::Tree);
        }
    }

    let (sx, sy) = SPAWN_TILE;
    if !map.is_border(sx, sy) {
        map.set(sx, sy, Tile::Ground);
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_tile_codes_roundtrip() {
        for code in 0..=5u8 {
            let tile = Tile::from_code(code).unwrap();
            assert_eq!(tile.code(), code);
        }
        assert_eq!(Tile::from_code(6), None);
    }

    #[test]
    fn test_passability() {
        assert!(Tile::Ground.is_passable());
        assert!(Tile::Bush.is_passable());
        assert!(Tile::Snow.is_passable());
        assert!(!Tile::Tree.is_passable());
        assert!(!Tile::Rock.is_passable());
        assert!(!Tile::Water.is_passable());
    }

    #[test]
    fn test_out_of_bounds_get() {
        let map = TileMap::filled(3, 2, Tile::Ground);
        assert_eq!(map.get(2, 1), Some(Tile::Ground));
        assert_eq!(map.get(3, 0), None);
        assert_eq!(map.get(0, -1), None);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_map(MAP_W, MAP_H, &mut Pcg32::seed_from_u64(7));
        let b = generate_map(MAP_W, MAP_H, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_spawn_tile_is_ground() {
        for seed in 0..64 {
            let map = generate_map(MAP_W, MAP_H, &mut Pcg32::seed_from_u64(seed));
            assert_eq!(map.get(SPAWN_TILE.0, SPAWN_TILE.1), Some(Tile::Ground));
        }
    }

    #[test]
    fn test_display_has_one_line_per_row() {
        let map = generate_map(MAP_W, MAP_H, &mut Pcg32::seed_from_u64(1));
        let text = map.to_string();
        assert_eq!(text.lines().count(), MAP_H as usize);
        assert!(text.lines().all(|l| l.chars().count() == MAP_W as usize));
        assert!(text.lines().next().unwrap().chars().all(|c| c == 'T'));
    }

    proptest! {
        #[test]
        fn prop_border_is_always_tree(seed in any::<u64>()) {
            let map = generate_map(MAP_W, MAP_H, &mut Pcg32::seed_from_u64(seed));
            for (x, y, tile) in map.iter() {
                if map.is_border(x, y) {
                    prop_assert_eq!(tile, Tile::Tree);
                } else {
                    prop_assert_ne!(tile, Tile::Snow);
                }
            }
        }
    }
}
