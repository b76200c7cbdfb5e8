//! Per-frame simulation step
//!
//! Movement, facing, walk animation and item proximity, plus the two
//! operations driven from outside the frame loop: collecting and the
//! one-second play clock.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;

use super::collision::try_move;
use super::items::ItemKind;
use super::state::{Facing, GameEvent, GameState, Player};
use crate::consts::*;
use crate::input::DirectionSet;
use crate::manhattan;

/// Input for a single step
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Directions held this frame
    pub directions: DirectionSet,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    let (dx, dy) = input.directions.axis();
    let mut dir = Vec2::new(dx as f32, dy as f32);
    if dx != 0 && dy != 0 {
        // Diagonals move at axis speed
        dir *= FRAC_1_SQRT_2;
    }

    let player = &mut state.player;
    player.vel = dir * PLAYER_SPEED;
    player.moving = dx != 0 || dy != 0;
    player.pos = try_move(&state.map, player.pos, player.vel).pos;

    update_facing(player);
    advance_animation(player);
    update_near_item(state);
}

/// Horizontal velocity wins over vertical; standing still keeps the last facing
fn update_facing(player: &mut Player) {
    if player.vel.x > 0.0 {
        player.facing = Facing::Right;
    } else if player.vel.x < 0.0 {
        player.facing = Facing::Left;
    } else if player.vel.y > 0.0 {
        player.facing = Facing::Down;
    } else if player.vel.y < 0.0 {
        player.facing = Facing::Up;
    }
}

fn advance_animation(player: &mut Player) {
    player.anim_tick = player.anim_tick.saturating_add(1);
    if player.moving {
        if player.anim_tick > WALK_FRAME_TICKS {
            player.anim_tick = 0;
            player.anim_frame = (player.anim_frame + 1) % WALK_FRAMES;
        }
    } else if player.anim_tick > IDLE_RESET_TICKS {
        player.anim_tick = 0;
        player.anim_frame = 0;
    }
}

/// Closest unfound item within pickup range; ties go to the lowest index
pub fn find_near_item(state: &GameState) -> Option<usize> {
    let here = state.player.tile();
    state
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.found)
        .map(|(i, item)| (manhattan(here, item.tile), i))
        .filter(|&(dist, _)| dist <= PICKUP_RANGE)
        .min()
        .map(|(_, i)| i)
}

fn update_near_item(state: &mut GameState) {
    let near = find_near_item(state);
    if near != state.near_item {
        state.near_item = near;
        state.events.push(GameEvent::NearItemChanged(near));
    }
}

/// Collect the item in range, if any.
///
/// Returns the collected kind, or `None` when there was nothing to pick up.
/// Collecting the last item stops the clock and queues `Completed` once.
pub fn collect(state: &mut GameState) -> Option<ItemKind> {
    let index = state.near_item?;
    let item = state.items.get_mut(index)?;
    if item.found {
        return None;
    }
    item.found = true;
    let kind = item.kind;

    state.found_count += 1;
    state.near_item = None;
    // Prompt clears before the pickup so the pickup message stays visible
    state.events.push(GameEvent::NearItemChanged(None));
    state.events.push(GameEvent::ItemCollected { index, kind });
    log::info!(
        "Found {} ({}/{})",
        kind.name(),
        state.found_count,
        state.total_items()
    );

    if state.found_count == state.total_items() && !state.completed {
        state.completed = true;
        state.clock_running = false;
        state.events.push(GameEvent::Completed {
            elapsed_secs: state.elapsed_secs,
        });
        log::info!("All items found in {}s", state.elapsed_secs);
    }

    Some(kind)
}

/// One second of play clock; returns whether the clock advanced
pub fn tick_clock(state: &mut GameState) -> bool {
    if state.clock_running && !state.completed {
        state.elapsed_secs += 1;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;
    use crate::sim::collision::box_is_clear;
    use crate::sim::items::Item;
    use crate::sim::map::{Tile, TileMap};
    use glam::IVec2;
    use proptest::prelude::*;

    /// 20x11 field with only the tree border
    fn open_field() -> TileMap {
        let mut map = TileMap::filled(MAP_W, MAP_H, Tile::Ground);
        for (x, y, _) in map.clone().iter() {
            if map.is_border(x, y) {
                map.set(x, y, Tile::Tree);
            }
        }
        map
    }

    fn session(items: Vec<Item>) -> GameState {
        GameState::from_parts(0, open_field(), items)
    }

    fn held(dirs: &[Direction]) -> TickInput {
        let mut directions = DirectionSet::none();
        for &d in dirs {
            directions.insert(d);
        }
        TickInput { directions }
    }

    #[test]
    fn test_no_input_keeps_position() {
        let mut state = session(Vec::new());
        let start = state.player.pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.pos, start);
        assert!(!state.player.moving);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_right_moves_by_speed() {
        let mut state = session(Vec::new());
        let start = state.player.pos;
        tick(&mut state, &held(&[Direction::Right]));
        assert!((state.player.pos.x - start.x - PLAYER_SPEED).abs() < 1e-4);
        assert_eq!(state.player.pos.y, start.y);
        assert_eq!(state.player.facing, Facing::Right);
    }

    #[test]
    fn test_diagonal_speed_matches_axis_speed() {
        let mut state = session(Vec::new());
        let start = state.player.pos;
        tick(&mut state, &held(&[Direction::Right, Direction::Down]));
        assert!((state.player.vel.length() - PLAYER_SPEED).abs() < 1e-4);
        assert!(((state.player.pos - start).length() - PLAYER_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut state = session(Vec::new());
        let start = state.player.pos;
        tick(&mut state, &held(&[Direction::Left, Direction::Right]));
        assert_eq!(state.player.pos, start);
        assert!(!state.player.moving);
    }

    #[test]
    fn test_horizontal_facing_wins() {
        let mut state = session(Vec::new());
        tick(&mut state, &held(&[Direction::Left, Direction::Up]));
        assert_eq!(state.player.facing, Facing::Left);
        tick(&mut state, &held(&[Direction::Up]));
        assert_eq!(state.player.facing, Facing::Up);
        // Releasing keeps the last facing
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.facing, Facing::Up);
    }

    #[test]
    fn test_walk_cycle_advances_every_seventh_tick() {
        let mut state = session(Vec::new());
        // Walk down and up so the player stays in the open
        let inputs = [Direction::Down, Direction::Up];
        let mut frames = Vec::new();
        for i in 0..28 {
            tick(&mut state, &held(&[inputs[(i / 7) % 2]]));
            frames.push(state.player.anim_frame);
        }
        assert_eq!(frames[5], 0);
        assert_eq!(frames[6], 1);
        assert_eq!(frames[13], 2);
        assert_eq!(frames[20], 3);
        assert_eq!(frames[27], 0);
    }

    #[test]
    fn test_idle_resets_frame() {
        let mut state = session(Vec::new());
        state.player.anim_frame = 2;
        for _ in 0..12 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.anim_frame, 2);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.anim_frame, 0);
        assert_eq!(state.player.anim_tick, 0);
    }

    #[test]
    fn test_near_item_prefers_closest_then_lowest_index() {
        let items = vec![
            Item::new(IVec2::new(3, 2), ItemKind::RedGift),
            Item::new(IVec2::new(2, 2), ItemKind::Snowman),
            Item::new(IVec2::new(1, 2), ItemKind::GreenGift),
        ];
        let mut state = session(items);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.near_item, Some(1));

        state.items[1].found = true;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.near_item, Some(0));
    }

    #[test]
    fn test_near_item_events_only_on_change() {
        let mut state = session(vec![Item::new(IVec2::new(2, 3), ItemKind::RedGift)]);
        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::NearItemChanged(Some(0))]
        );
    }

    #[test]
    fn test_far_item_not_near() {
        let mut state = session(vec![Item::new(IVec2::new(3, 3), ItemKind::RedGift)]);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.near_item, None);
        assert_eq!(collect(&mut state), None);
        assert_eq!(state.found_count, 0);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let items = vec![
            Item::new(IVec2::new(2, 3), ItemKind::RedGift),
            Item::new(IVec2::new(10, 5), ItemKind::Snowman),
        ];
        let mut state = session(items);
        tick(&mut state, &TickInput::default());
        assert_eq!(collect(&mut state), Some(ItemKind::RedGift));
        assert_eq!(state.found_count, 1);
        assert!(state.items[0].found);
        assert_eq!(state.near_item, None);

        assert_eq!(collect(&mut state), None);
        tick(&mut state, &TickInput::default());
        assert_eq!(collect(&mut state), None);
        assert_eq!(state.found_count, 1);
        assert!(!state.completed);
    }

    #[test]
    fn test_completion_flips_once_and_stops_clock() {
        let mut state = session(vec![Item::new(IVec2::new(3, 2), ItemKind::GreenGift)]);
        assert!(tick_clock(&mut state));
        assert!(tick_clock(&mut state));
        tick(&mut state, &TickInput::default());
        state.drain_events();

        assert_eq!(collect(&mut state), Some(ItemKind::GreenGift));
        assert!(state.completed);
        assert!(!state.clock_running);
        let events = state.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::Completed { elapsed_secs: 2 })
        );

        assert!(!tick_clock(&mut state));
        assert_eq!(state.elapsed_secs, 2);
        assert_eq!(collect(&mut state), None);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_movement_continues_after_completion() {
        let mut state = session(Vec::new());
        state.completed = true;
        let start = state.player.pos;
        tick(&mut state, &held(&[Direction::Down]));
        assert!(state.player.pos.y > start.y);
    }

    #[test]
    fn test_blocked_by_tree_border() {
        let mut state = session(Vec::new());
        for _ in 0..100 {
            tick(&mut state, &held(&[Direction::Up, Direction::Left]));
        }
        // Box stops flush against the border trees of row/column 0
        assert!(state.player.pos.x - PLAYER_HALF_EXTENT >= TILE);
        assert!(state.player.pos.y - PLAYER_HALF_EXTENT >= TILE);
        assert!(box_is_clear(&state.map, state.player.pos));
    }

    fn direction_strategy() -> impl Strategy<Value = DirectionSet> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(up, down, left, right)| DirectionSet {
                up,
                down,
                left,
                right,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_player_never_overlaps_blocking_tiles(
            seed in any::<u64>(),
            inputs in prop::collection::vec((direction_strategy(), 1usize..40), 1..25),
        ) {
            let mut state = GameState::new(seed);
            prop_assert!(box_is_clear(&state.map, state.player.pos));
            for (directions, frames) in inputs {
                for _ in 0..frames {
                    tick(&mut state, &TickInput { directions });
                    prop_assert!(box_is_clear(&state.map, state.player.pos));
                }
            }
        }

        #[test]
        fn prop_found_count_monotone_and_bounded(
            seed in any::<u64>(),
            inputs in prop::collection::vec((direction_strategy(), 1usize..30, any::<bool>()), 1..40),
        ) {
            let mut state = GameState::new(seed);
            let mut last = 0;
            let mut completions = 0;
            for (directions, frames, try_collect) in inputs {
                for _ in 0..frames {
                    tick(&mut state, &TickInput { directions });
                }
                if try_collect {
                    collect(&mut state);
                }
                completions += state
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::Completed { .. }))
                    .count();
                prop_assert!(state.found_count >= last);
                prop_assert!(state.found_count <= state.total_items());
                prop_assert_eq!(state.completed, state.found_count == state.total_items() && completions == 1);
                last = state.found_count;
            }
            prop_assert!(completions <= 1);
        }
    }
}
