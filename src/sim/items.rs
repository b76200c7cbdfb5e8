//! Collectible items: catalog and placement

use glam::IVec2;
use rand::Rng;

use super::map::TileMap;
use crate::consts::ITEM_PLACEMENT_TRIES;

/// Item catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    RedGift,
    GreenGift,
    Snowman,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::RedGift, ItemKind::GreenGift, ItemKind::Snowman];

    /// Name shown in the inventory
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::RedGift => "red gift",
            ItemKind::GreenGift => "green gift",
            ItemKind::Snowman => "snowman",
        }
    }

    /// Marker colour (CSS)
    pub fn color(&self) -> &'static str {
        match self {
            ItemKind::RedGift => "#ff4444",
            ItemKind::GreenGift => "#44ff44",
            ItemKind::Snowman => "#ffffff",
        }
    }

    /// Glyph drawn on the marker
    pub fn symbol(&self) -> &'static str {
        match self {
            ItemKind::RedGift | ItemKind::GreenGift => "🎁",
            ItemKind::Snowman => "⛄",
        }
    }
}

/// A hidden item on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub tile: IVec2,
    pub kind: ItemKind,
    pub found: bool,
}

impl Item {
    pub fn new(tile: IVec2, kind: ItemKind) -> Self {
        Self {
            tile,
            kind,
            found: false,
        }
    }
}

/// Place up to `count` items on interior tiles that can hide them.
///
/// Each item gets `ITEM_PLACEMENT_TRIES` random picks; an item that finds no
/// free eligible tile is dropped, so the result may hold fewer than `count`.
pub fn place_items<R: Rng>(map: &TileMap, count: usize, rng: &mut R) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::with_capacity(count);
    if map.width() < 3 || map.height() < 3 {
        return items;
    }

    for n in 0..count {
        let mut placed = false;
        for _ in 0..ITEM_PLACEMENT_TRIES {
            let tile = IVec2::new(
                rng.random_range(1..map.width() - 1),
                rng.random_range(1..map.height() - 1),
            );
            let eligible = map.at(tile).is_some_and(|t| t.can_hide_item());
            if eligible && !items.iter().any(|it| it.tile == tile) {
                let kind = ItemKind::ALL[rng.random_range(0..ItemKind::ALL.len())];
                items.push(Item::new(tile, kind));
                placed = true;
                break;
            }
        }
        if !placed {
            log::debug!("Item {} dropped after {} tries", n, ITEM_PLACEMENT_TRIES);
        }
    }

    items
}
