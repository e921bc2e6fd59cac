//! Visualizer configuration
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! command-line overrides.  Every field has a default so a config file only
//! needs to name what it changes.

use crate::engine::StepKind;
use crate::error::ScriptError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub layout: LayoutConfig,
    pub playback: PlaybackConfig,
    pub timing: TimingConfig,
}

impl VisualizerConfig {
    pub fn from_json(text: &str, path: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(text).map_err(|source| ScriptError::Json {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&text, &display)
    }
}

/// Geometry constants for [`crate::layout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal spread at the root; each level scales it by `decay_factor`
    pub node_width: f64,
    pub level_height: f64,
    pub decay_factor: f64,
    /// Visual radius used to trim connectors to node boundaries
    pub node_radius: f64,
    /// Distance between neighbouring cells of a list, stack or queue
    pub list_pitch: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            node_width: 120.0,
            level_height: 80.0,
            decay_factor: 0.6,
            node_radius: 20.0,
            list_pitch: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Real time between operations while auto-playing
    pub auto_play_interval_ms: u64,
    /// Divides every step duration; non-positive values mean 1.0
    pub speed: f64,
}

impl PlaybackConfig {
    pub fn auto_play_interval(&self) -> Duration {
        Duration::from_millis(self.auto_play_interval_ms.max(1))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            auto_play_interval_ms: 1500,
            speed: 1.0,
        }
    }
}

/// Base duration of each step kind, before the playback speed is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub compare_ms: u64,
    pub mutate_ms: u64,
    pub visit_ms: u64,
    pub info_ms: u64,
    #[serde(skip)]
    pub speed: f64,
}

impl TimingConfig {
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Duration of one step of `kind`, scaled by speed, never below 1 ms
    pub fn duration_ms(&self, kind: StepKind) -> u64 {
        let base = match kind {
            StepKind::Compare => self.compare_ms,
            StepKind::Mutate => self.mutate_ms,
            StepKind::Visit => self.visit_ms,
            StepKind::Info | StepKind::NotFound => self.info_ms,
        };
        let speed = if self.speed.is_finite() && self.speed > 0.0 {
            self.speed
        } else {
            1.0
        };
        ((base as f64 / speed).round() as u64).max(1)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            compare_ms: 600,
            mutate_ms: 800,
            visit_ms: 500,
            info_ms: 400,
            speed: 1.0,
        }
    }
}
