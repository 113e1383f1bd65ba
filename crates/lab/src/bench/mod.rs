//! Instantiation microbenchmarks

mod geometry;
mod material;

pub use geometry::{
    geometry_presets, measure_geometry, run_geometry_benchmark, summarize_geometry,
    GeometrySummary, GeometryTestResult,
};
pub use material::{
    measure_material, random_texture_params, run_material_benchmark, MaterialTestResult,
    TextureParams,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Geometry benchmark preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchMode {
    /// One low-resolution config per geometry type
    #[default]
    Basic,
    /// Two configs per type
    All,
    /// High-resolution configs
    Extreme,
    /// 100 random configs per type
    Random,
}

impl BenchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenchMode::Basic => "basic",
            BenchMode::All => "all",
            BenchMode::Extreme => "extreme",
            BenchMode::Random => "random",
        }
    }
}

impl fmt::Display for BenchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BenchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(BenchMode::Basic),
            "all" => Ok(BenchMode::All),
            "extreme" => Ok(BenchMode::Extreme),
            "random" => Ok(BenchMode::Random),
            other => Err(format!("unknown bench mode: {other}")),
        }
    }
}
