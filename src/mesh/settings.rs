use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::BoundaryPolicy;

pub const NODE_COUNT_RANGE: RangeInclusive<usize> = 2..=100;
pub const SPEED_RANGE: RangeInclusive<f64> = 0.0..=20.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshSettings {
    pub nodes: usize,
    pub speed: f64,
    pub seed: Option<u64>,
    pub boundary: BoundaryPolicy,
    pub paused: bool,
    pub fullscreen: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            nodes: 16,
            speed: 10.0,
            seed: None,
            boundary: BoundaryPolicy::default(),
            paused: false,
            fullscreen: false,
        }
    }
}

impl MeshSettings {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid mesh settings JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Pulls values from outside the control ranges back inside them.
    pub fn clamped(mut self) -> Self {
        let nodes = self
            .nodes
            .clamp(*NODE_COUNT_RANGE.start(), *NODE_COUNT_RANGE.end());
        if nodes != self.nodes {
            log::warn!("node count {} out of range, using {nodes}", self.nodes);
            self.nodes = nodes;
        }

        let speed = if self.speed.is_finite() {
            self.speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
        } else {
            Self::default().speed
        };
        if speed != self.speed {
            log::warn!("speed {} out of range, using {speed}", self.speed);
            self.speed = speed;
        }

        self
    }
}
