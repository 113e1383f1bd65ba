//! Lab settings

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bench::BenchMode;
use crate::error::SceneError;

/// Random scene generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSceneSettings {
    /// Upper bound on root objects (at least one is always generated)
    pub max_root_objects: usize,
    /// Objects at this depth never get children
    pub max_depth: usize,
    /// Upper bound on children per object
    pub max_children: usize,
    /// Chance (0.0 - 1.0) that an object below `max_depth` branches
    pub branch_probability: f64,
}

impl Default for RandomSceneSettings {
    fn default() -> Self {
        Self {
            max_root_objects: 3,
            max_depth: 2,
            max_children: 2,
            branch_probability: 0.5,
        }
    }
}

/// Identity report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Show previous uids next to changed entries
    pub show_previous: bool,
    /// Only list objects with at least one changed primitive
    pub changed_only: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            show_previous: true,
            changed_only: false,
        }
    }
}

/// Benchmark settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchSettings {
    /// Geometry preset to run
    pub mode: BenchMode,
    /// Number of random texture sizes in the material benchmark
    pub material_samples: usize,
    /// Largest random texture side in pixels
    pub max_texture_side: u32,
    /// Fixed seed for reproducible random presets
    pub seed: Option<u64>,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            mode: BenchMode::Basic,
            material_samples: 100,
            max_texture_side: 4000,
            seed: None,
        }
    }
}

/// All lab settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabSettings {
    /// Random scene generation
    pub scene: RandomSceneSettings,
    /// Identity report
    pub report: ReportSettings,
    /// Benchmarks
    pub bench: BenchSettings,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for LabSettings {
    fn default() -> Self {
        Self {
            scene: RandomSceneSettings::default(),
            report: ReportSettings::default(),
            bench: BenchSettings::default(),
            log_filter: "scene_lab=info,scene_lab_lib=info".to_string(),
        }
    }
}

impl LabSettings {
    /// Load settings from the config dir, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "scene-lab", "scene-lab") {
            let config_path = dirs.config_dir().join("settings.json");
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("ignoring settings: {e}"),
                }
            }
        }
        Self::default()
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }
}
