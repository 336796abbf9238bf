//! Game settings and preferences
//!
//! Read from the page URL query string at startup, e.g.
//! `index.html?seed=42&size=9&slide=1`. Nothing is stored between visits.

use serde::{Deserialize, Serialize};

use crate::tuning::{MovementPolicy, Tuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Fixed run seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Silence all sound effects
    pub muted: bool,

    // === Camera ===
    /// Camera height above the player
    pub camera_height: f32,
    /// Camera distance behind the player (+z)
    pub camera_distance: f32,

    // === Tuning overrides ===
    /// Starting maze dimension
    pub start_dimension: Option<usize>,
    /// Player speed per tick
    pub player_speed: Option<f32>,
    /// Collision margin around walls
    pub collision_margin: Option<f32>,
    /// Slide along walls instead of stopping
    pub slide: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            show_fps: true,

            master_volume: 0.8,
            muted: false,

            // Matches the classic fixed camera at (0, 5, 10)
            camera_height: 5.0,
            camera_distance: 10.0,

            start_dimension: None,
            player_speed: None,
            collision_margin: None,
            slide: false,
        }
    }
}

impl Settings {
    /// Parse settings from a URL query string (leading `?` optional)
    ///
    /// Unknown keys are ignored; values that fail to parse keep their default.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let ok = match key {
                "seed" => parse_into(value, |v| settings.seed = Some(v)),
                "fps" => parse_flag(value, |v| settings.show_fps = v),
                "volume" => parse_into(value, |v: f32| settings.master_volume = v.clamp(0.0, 1.0)),
                "mute" => parse_flag(value, |v| settings.muted = v),
                "cam_height" => parse_into(value, |v| settings.camera_height = v),
                "cam_distance" => parse_into(value, |v| settings.camera_distance = v),
                "size" => parse_into(value, |v| settings.start_dimension = Some(v)),
                "speed" => parse_into(value, |v| settings.player_speed = Some(v)),
                "margin" => parse_into(value, |v| settings.collision_margin = Some(v)),
                "slide" => parse_flag(value, |v| settings.slide = v),
                _ => true,
            };
            if !ok {
                log::warn!("Ignoring setting {key}={value}");
            }
        }

        settings
    }

    /// Apply overrides to a tuning; falls back to `base` if the result is invalid
    pub fn apply_to(&self, base: &Tuning) -> Tuning {
        let mut tuning = base.clone();
        if let Some(dimension) = self.start_dimension {
            tuning.start_dimension = dimension;
        }
        if let Some(speed) = self.player_speed {
            tuning.player_speed = speed;
        }
        if let Some(margin) = self.collision_margin {
            tuning.collision_margin = margin;
        }
        if self.slide {
            tuning.movement_policy = MovementPolicy::Slide;
        }

        match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Settings rejected ({e}), using default tuning");
                base.clone()
            }
        }
    }

    /// Load settings from the current page URL (WASM only)
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

fn parse_into<T: std::str::FromStr>(value: &str, apply: impl FnOnce(T)) -> bool {
    match value.parse() {
        Ok(v) => {
            apply(v);
            true
        }
        Err(_) => false,
    }
}

fn parse_flag(value: &str, apply: impl FnOnce(bool)) -> bool {
    match value.to_lowercase().as_str() {
        "" | "1" | "true" | "on" | "yes" => apply(true),
        "0" | "false" | "off" | "no" => apply(false),
        _ => return false,
    }
    true
}
