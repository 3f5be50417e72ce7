use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

pub const POINT_COUNT_RANGE: RangeInclusive<usize> = 3..=20;
pub const TOLERANCE_RANGE: RangeInclusive<f64> = 1.0..=10.0;
pub const TOLERANCE_STEP: f64 = 0.5;
pub const MAX_FAILED_RANGE: RangeInclusive<u32> = 5..=50;

/// Round settings. The game core accepts any values; the bounds above are
/// input hints for whoever edits the record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub point_count: usize,
    pub tolerance_percent: f64,
    pub max_failed_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            point_count: 10,
            tolerance_percent: 3.0,
            max_failed_attempts: 40,
        }
    }
}

impl GameConfig {
    /// Copy of this config with every field pulled into its input bounds
    pub fn clamped(self) -> Self {
        Self {
            point_count: self
                .point_count
                .clamp(*POINT_COUNT_RANGE.start(), *POINT_COUNT_RANGE.end()),
            tolerance_percent: self
                .tolerance_percent
                .clamp(*TOLERANCE_RANGE.start(), *TOLERANCE_RANGE.end()),
            max_failed_attempts: self
                .max_failed_attempts
                .clamp(*MAX_FAILED_RANGE.start(), *MAX_FAILED_RANGE.end()),
        }
    }

    pub fn step_point_count(self, up: bool) -> Self {
        let point_count = if up {
            self.point_count.saturating_add(1)
        } else {
            self.point_count.saturating_sub(1)
        };
        Self {
            point_count,
            ..self
        }
        .clamped()
    }

    pub fn step_tolerance(self, up: bool) -> Self {
        let delta = if up { TOLERANCE_STEP } else { -TOLERANCE_STEP };
        Self {
            tolerance_percent: self.tolerance_percent + delta,
            ..self
        }
        .clamped()
    }

    pub fn step_max_failed(self, up: bool) -> Self {
        let max_failed_attempts = if up {
            self.max_failed_attempts.saturating_add(1)
        } else {
            self.max_failed_attempts.saturating_sub(1)
        };
        Self {
            max_failed_attempts,
            ..self
        }
        .clamped()
    }
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("pointmark_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<GameConfig>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                    GameConfig::default()
                }
            },
            Err(_) => GameConfig::default(),
        }
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
