//! Keyboard and on-screen d-pad input
//!
//! Browser events only ever add or remove held keys; the simulation reads a
//! `DirectionSet` snapshot once per frame.

use std::collections::BTreeSet;

use crate::consts::DOUBLE_TAP_MS;

/// A cardinal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Keys that count as holding this direction (lower-cased `KeyboardEvent.key`)
    pub fn keys(self) -> [&'static str; 2] {
        match self {
            Direction::Up => ["arrowup", "w"],
            Direction::Down => ["arrowdown", "s"],
            Direction::Left => ["arrowleft", "a"],
            Direction::Right => ["arrowright", "d"],
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .find(|d| d.keys().contains(&key))
    }
}

/// Directions held during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionSet {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, dir: Direction) -> Self {
        self.insert(dir);
        self
    }

    pub fn insert(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    /// Raw axis values in {-1, 0, 1}; opposing directions cancel
    pub fn axis(&self) -> (i32, i32) {
        let dx = self.right as i32 - self.left as i32;
        let dy = self.down as i32 - self.up as i32;
        (dx, dy)
    }
}

/// What a key press means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Collect,
}

/// Classify a key (case-insensitive)
pub fn map_key(key: &str) -> Option<KeyAction> {
    let key = key.to_lowercase();
    if key == "e" {
        return Some(KeyAction::Collect);
    }
    Direction::from_key(&key).map(KeyAction::Move)
}

/// Keys whose browser default (scrolling) is suppressed
pub fn suppresses_default(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "arrowup" | "arrowdown" | "arrowleft" | "arrowright" | " "
    )
}

/// On-screen d-pad buttons (`data-dir` attribute values)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpadButton {
    North,
    South,
    East,
    West,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl DpadButton {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "north" => Some(DpadButton::North),
            "south" => Some(DpadButton::South),
            "east" => Some(DpadButton::East),
            "west" => Some(DpadButton::West),
            "nw" => Some(DpadButton::NorthWest),
            "ne" => Some(DpadButton::NorthEast),
            "sw" => Some(DpadButton::SouthWest),
            "se" => Some(DpadButton::SouthEast),
            _ => None,
        }
    }

    pub fn directions(self) -> &'static [Direction] {
        use Direction::*;
        match self {
            DpadButton::North => &[Up],
            DpadButton::South => &[Down],
            DpadButton::East => &[Right],
            DpadButton::West => &[Left],
            DpadButton::NorthWest => &[Up, Left],
            DpadButton::NorthEast => &[Up, Right],
            DpadButton::SouthWest => &[Down, Left],
            DpadButton::SouthEast => &[Down, Right],
        }
    }
}

/// Tracks held keys between frames
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    held: BTreeSet<String>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    /// A d-pad touch replaces whatever was held
    pub fn dpad_press(&mut self, button: DpadButton) {
        self.held.clear();
        for dir in button.directions() {
            self.held.insert(dir.keys()[0].to_string());
        }
    }

    pub fn dpad_release(&mut self) {
        self.held.clear();
    }

    /// Snapshot for this frame
    pub fn directions(&self) -> DirectionSet {
        let mut set = DirectionSet::none();
        for key in &self.held {
            if let Some(dir) = Direction::from_key(key) {
                set.insert(dir);
            }
        }
        set
    }
}

/// Page-level double-tap detector; the second tap of a pair has its default
/// (browser zoom) prevented
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleTapGuard {
    last_touch_end: Option<f64>,
}

impl DoubleTapGuard {
    /// Record a touch end at `now_ms`; returns whether to prevent its default
    pub fn touch_end(&mut self, now_ms: f64) -> bool {
        let suppress = self
            .last_touch_end
            .is_some_and(|last| now_ms - last <= DOUBLE_TAP_MS);
        self.last_touch_end = Some(now_ms);
        suppress
    }
}
