//! 2D canvas backend: replays draw commands on a `CanvasRenderingContext2d`

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::draw::DrawCmd;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        Ok(Self { ctx })
    }

    /// Draw one frame
    pub fn render(&self, cmds: &[DrawCmd]) {
        let ctx = &self.ctx;
        for cmd in cmds {
            match cmd {
                DrawCmd::Clear { width, height } => {
                    ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
                }
                DrawCmd::Rect { pos, size, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                DrawCmd::Triangle { points, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.begin_path();
                    ctx.move_to(points[0].x as f64, points[0].y as f64);
                    ctx.line_to(points[1].x as f64, points[1].y as f64);
                    ctx.line_to(points[2].x as f64, points[2].y as f64);
                    ctx.close_path();
                    ctx.fill();
                }
                DrawCmd::Text {
                    pos,
                    text,
                    font,
                    color,
                } => {
                    ctx.set_fill_style_str(color);
                    ctx.set_font(font);
                    if let Err(e) = ctx.fill_text(text, pos.x as f64, pos.y as f64) {
                        log::warn!("fill_text failed: {:?}", e);
                    }
                }
            }
        }
    }
}
