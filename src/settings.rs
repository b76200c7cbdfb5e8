//! Runtime settings
//!
//! Read from the page URL query (`?seed=42&items=5&reduced_motion=1`),
//! percent-decoded the way browsers encode forms. Nothing is stored between
//! visits.

use crate::consts::ITEM_COUNT;

/// Upper bound for the `items` query parameter
pub const MAX_ITEMS: usize = 50;

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Fixed map seed (random per visit when unset)
    pub seed: Option<u64>,
    /// Items to hide
    pub item_count: usize,
    /// Prefix for the score API (`""` = same origin)
    pub api_base: String,
    /// Disable the per-frame ground sparkle
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            item_count: ITEM_COUNT,
            api_base: String::new(),
            reduced_motion: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Parse a URL query string; unknown keys are ignored, bad values keep defaults
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "seed" => match value.parse() {
                    Ok(seed) => settings.seed = Some(seed),
                    Err(_) => log::warn!("Ignoring bad seed {:?}", value),
                },
                "items" => match value.parse::<usize>() {
                    Ok(n) => settings.item_count = n.min(MAX_ITEMS),
                    Err(_) => log::warn!("Ignoring bad item count {:?}", value),
                },
                "api" => settings.api_base = value.trim_end_matches('/').to_string(),
                "reduced_motion" => match parse_flag(&value) {
                    Some(flag) => settings.reduced_motion = flag,
                    None => log::warn!("Ignoring bad reduced_motion {:?}", value),
                },
                _ => {}
            }
        }

        settings
    }

    /// Map seed to use, falling back to `fallback` when none was given
    pub fn map_seed(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let settings = Self::from_query(&query);
        log::info!("Settings: {:?}", settings);
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
