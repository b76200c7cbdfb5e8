//! HUD messages and DOM glue
//!
//! Element ids match `index.html`. The message model is platform independent;
//! everything touching the document is browser only.

use crate::consts::MESSAGE_DURATION_MS;
use crate::sim::ItemKind;

/// Shown while an item is in pickup range
pub const COLLECT_PROMPT: &str = "Press E to collect";

/// Element ids
pub mod ids {
    pub const CANVAS: &str = "game";
    pub const MESSAGE: &str = "message";
    pub const FOUND: &str = "found";
    pub const TOTAL: &str = "total";
    pub const TIMER: &str = "timer";
    pub const INVENTORY: &str = "inventory";
    pub const DPAD: &str = "dpad";
    pub const COLLECT_BTN: &str = "collectBtn";
    pub const SCORE_MODAL: &str = "scoreModal";
    pub const FINAL_TIME: &str = "finalTime";
    pub const IDENTIFIER_INPUT: &str = "discordId";
    pub const SUBMIT_BTN: &str = "submitScore";
    pub const CANCEL_BTN: &str = "cancelScore";
    pub const LEADERBOARD_MODAL: &str = "leaderboardModal";
    pub const LEADERBOARD: &str = "leaderboard";
    pub const LEADERBOARD_BTN: &str = "leaderboardBtn";
    pub const CLOSE_LEADERBOARD_BTN: &str = "closeLeaderboard";
    pub const FULLSCREEN_BTN: &str = "fullscreenBtn";
}

/// Tone of a HUD message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

impl MessageKind {
    pub fn color(&self) -> &'static str {
        match self {
            MessageKind::Info => "#ffd86b",
            MessageKind::Success => "#51cf66",
            MessageKind::Error => "#ff6b6b",
        }
    }
}

pub fn found_message(kind: ItemKind) -> String {
    format!("You found a {}!", kind.name())
}

#[derive(Debug, Clone, PartialEq)]
struct TimedMessage {
    text: String,
    kind: MessageKind,
    expires_at_ms: f64,
}

/// The HUD message line.
///
/// A timed message (pickup, submit result, error) holds the line for
/// `MESSAGE_DURATION_MS`; a newer one replaces it and restarts the timer.
/// The collect prompt only shows while no timed message is live.
#[derive(Debug, Clone, Default)]
pub struct MessageLine {
    timed: Option<TimedMessage>,
    prompt: bool,
}

impl MessageLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: impl Into<String>, kind: MessageKind, now_ms: f64) {
        self.timed = Some(TimedMessage {
            text: text.into(),
            kind,
            expires_at_ms: now_ms + MESSAGE_DURATION_MS as f64,
        });
    }

    pub fn set_prompt(&mut self, visible: bool) {
        self.prompt = visible;
    }

    /// What the line reads at `now_ms`
    pub fn current(&self, now_ms: f64) -> Option<(&str, MessageKind)> {
        match &self.timed {
            Some(m) if now_ms < m.expires_at_ms => Some((m.text.as_str(), m.kind)),
            _ if self.prompt => Some((COLLECT_PROMPT, MessageKind::Info)),
            _ => None,
        }
    }
}

/// What the fullscreen button does given the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenAction {
    Enter,
    Exit,
}

impl FullscreenAction {
    pub fn toggle(is_fullscreen: bool) -> Self {
        if is_fullscreen {
            FullscreenAction::Exit
        } else {
            FullscreenAction::Enter
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::*;

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, HtmlInputElement};

    use super::{FullscreenAction, MessageKind, ids};

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn html_element(id: &str) -> Option<HtmlElement> {
        document()?.get_element_by_id(id)?.dyn_into().ok()
    }

    pub fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    pub fn set_html(id: &str, html: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_inner_html(html);
        }
    }

    /// Write the message line, touching the DOM only when the text changes
    pub fn render_message(line: Option<(&str, MessageKind)>) {
        let Some(el) = html_element(ids::MESSAGE) else {
            return;
        };
        let (text, kind) = line.unwrap_or(("", MessageKind::Info));
        if el.text_content().as_deref() == Some(text) {
            return;
        }
        el.set_text_content(Some(text));
        let _ = el.style().set_property("color", kind.color());
    }

    /// Enter or leave fullscreen on the whole page; failures are ignored
    pub fn toggle_fullscreen() {
        let Some(document) = document() else {
            return;
        };
        match FullscreenAction::toggle(document.fullscreen_element().is_some()) {
            FullscreenAction::Enter => {
                if let Some(root) = document.document_element() {
                    if let Err(e) = root.request_fullscreen() {
                        log::debug!("Fullscreen refused: {:?}", e);
                    }
                }
            }
            FullscreenAction::Exit => document.exit_fullscreen(),
        }
    }

    pub fn set_modal_visible(id: &str, visible: bool) {
        if let Some(el) = html_element(id) {
            let display = if visible { "flex" } else { "none" };
            let _ = el.style().set_property("display", display);
        }
    }

    pub fn add_inventory_item(name: &str) {
        let Some(document) = document() else {
            return;
        };
        let Some(inventory) = document.get_element_by_id(ids::INVENTORY) else {
            return;
        };
        if let Ok(div) = document.create_element("div") {
            div.set_class_name("item");
            div.set_text_content(Some(name));
            let _ = inventory.append_child(&div);
        }
    }

    /// Current value of a text input
    pub fn input_value(id: &str) -> String {
        document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    /// Reset and focus the identifier field
    pub fn reset_identifier_input() {
        if let Some(input) = document()
            .and_then(|d| d.get_element_by_id(ids::IDENTIFIER_INPUT))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value("");
            let _ = input.focus();
        }
    }

    pub fn set_disabled(id: &str, disabled: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = if disabled {
                el.set_attribute("disabled", "")
            } else {
                el.remove_attribute("disabled")
            };
        }
    }
}
