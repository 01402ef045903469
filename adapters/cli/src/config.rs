//! TOML run configuration.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use no_room_core::{CellCoord, EntityKind, Rules, LOGICAL_HEIGHT, LOGICAL_WIDTH};
use serde::Deserialize;

/// Everything a run can be configured with besides the wave schedule.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Prices, rewards and policy points.
    pub(crate) rules: Rules,
    /// Frame pacing of the headless run.
    pub(crate) frame: FrameConfig,
    /// Entities placed during setup before the run starts.
    pub(crate) layout: Vec<LayoutEntry>,
}

impl GameConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse config toml contents")?;
        config.frame.validate()?;
        Ok(config)
    }
}

/// Frame pacing and window emulation for the headless backend.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FrameConfig {
    pub(crate) frames_per_second: u32,
    pub(crate) max_seconds: f64,
    pub(crate) window_width: f32,
    pub(crate) window_height: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            max_seconds: 300.0,
            window_width: LOGICAL_WIDTH as f32,
            window_height: LOGICAL_HEIGHT as f32,
        }
    }
}

impl FrameConfig {
    /// Applies command-line overrides on top of the file values.
    #[must_use]
    pub(crate) fn overridden(self, fps: Option<u32>, max_seconds: Option<f64>) -> Self {
        Self {
            frames_per_second: fps.unwrap_or(self.frames_per_second),
            max_seconds: max_seconds.unwrap_or(self.max_seconds),
            ..self
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.frames_per_second == 0 {
            bail!("frames_per_second must be positive");
        }
        if !self.max_seconds.is_finite() || self.max_seconds < 0.0 {
            bail!("max_seconds must be a non-negative number, got {}", self.max_seconds);
        }
        Ok(())
    }

    /// Simulated time covered by a single frame.
    #[must_use]
    pub(crate) fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frames_per_second.max(1)))
    }

    /// Number of frames that fit into the configured run length.
    #[must_use]
    pub(crate) fn max_frames(&self) -> u64 {
        (self.max_seconds * f64::from(self.frames_per_second)).ceil() as u64
    }
}

/// Entity placed onto the grid while the run is being set up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LayoutEntry {
    pub(crate) column: u32,
    pub(crate) row: u32,
    pub(crate) kind: EntityKind,
}

impl LayoutEntry {
    pub(crate) const fn cell(&self) -> CellCoord {
        CellCoord::new(self.column, self.row)
    }
}
