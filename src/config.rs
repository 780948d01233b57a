//! Engine tuning: speeds, viewport, camera margin and input thresholds.

use std::path::Path;

use macroquad::prelude::{vec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Tunables shared by the play view and the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Play viewport width (pixels)
    pub viewport_width: f32,
    /// Play viewport height (pixels)
    pub viewport_height: f32,

    // === Movement ===
    /// Pixels per tick at full stick while walking
    pub walk_speed: f32,
    /// Pixels per tick at full stick while the run button is held
    pub sprint_speed: f32,
    /// Speeds at or below this skip the position update
    pub move_epsilon: f32,

    // === Camera ===
    /// Distance from a map edge (in tiles) at which the camera snaps to it
    pub camera_margin_tiles: u32,

    // === Menu navigation ===
    /// `|dy|` above this moves menu focus
    pub menu_trigger_threshold: f32,
    /// `|dy|` must drop below this before focus can move again
    pub menu_rearm_threshold: f32,

    // === Interaction ===
    /// Ticks a transient notice stays visible
    pub notice_ticks: u32,
    /// Quantity handed to interaction handlers
    pub interaction_quantity: u32,

    // === Editor ===
    /// Rows for a freshly generated map
    pub default_rows: usize,
    /// Columns for a freshly generated map
    pub default_cols: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 600.0,
            viewport_height: 400.0,

            walk_speed: 2.0,
            sprint_speed: 4.0,
            move_epsilon: 0.01,

            camera_margin_tiles: 5,

            menu_trigger_threshold: 0.5,
            menu_rearm_threshold: 0.4,

            // ~2 s at 60 fps
            notice_ticks: 120,
            interaction_quantity: 1,

            default_rows: 8,
            default_cols: 8,
        }
    }
}

impl EngineConfig {
    /// Viewport size as a vector
    pub fn viewport(&self) -> Vec2 {
        vec2(self.viewport_width, self.viewport_height)
    }

    /// Speed for the current run state before scaling by stick magnitude
    pub fn base_speed(&self, running: bool) -> f32 {
        if running {
            self.sprint_speed
        } else {
            self.walk_speed
        }
    }

    /// Parse a config from JSON text; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config file, returning the typed error
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| GridError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| GridError::Json {
            path: Some(p.to_path_buf()),
            source,
        })
    }

    /// Read a config file, falling back to defaults if it is missing or malformed
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load(&path) {
            Ok(cfg) => {
                log::info!("Loaded engine config from {}", path.as_ref().display());
                cfg
            }
            Err(e) => {
                log::warn!("{}; using default engine config", e);
                Self::default()
            }
        }
    }
}
