//! Draw command types for 2D rendering

use glam::Vec2;

/// CSS colour string
pub type Color = &'static str;

/// One 2D drawing primitive, in canvas pixel space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Clear the whole canvas
    Clear { width: f32, height: f32 },
    /// Axis-aligned filled rectangle
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    /// Filled triangle
    Triangle { points: [Vec2; 3], color: Color },
    /// Text centred on `pos`
    Text {
        pos: Vec2,
        text: &'static str,
        font: &'static str,
        color: Color,
    },
}

impl DrawCmd {
    pub const fn rect(x: f32, y: f32, w: f32, h: f32, color: Color) -> Self {
        DrawCmd::Rect {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            color,
        }
    }

    pub const fn triangle(a: Vec2, b: Vec2, c: Vec2, color: Color) -> Self {
        DrawCmd::Triangle {
            points: [a, b, c],
            color,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            DrawCmd::Clear { .. } => None,
            DrawCmd::Rect { color, .. }
            | DrawCmd::Triangle { color, .. }
            | DrawCmd::Text { color, .. } => Some(*color),
        }
    }
}
