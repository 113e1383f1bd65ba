use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::Instant;

use rand::Rng;
use serde::Serialize;

use super::BenchMode;
use crate::metrics::elapsed_ms;
use crate::render::{GeometryBuffers, GeometryParams};

/// One geometry benchmark sample
#[derive(Debug, Clone, Serialize)]
pub struct GeometryTestResult {
    pub kind: &'static str,
    pub parameters: GeometryParams,
    pub vertex_count: usize,
    pub geometry_instance_creation_time_ms: f64,
    pub mesh_instancing_time_ms: f64,
}

/// Per-kind averages over a benchmark run
#[derive(Debug, Clone, Serialize)]
pub struct GeometrySummary {
    pub kind: &'static str,
    pub samples: usize,
    pub avg_creation_time_ms: f64,
    pub avg_mesh_time_ms: f64,
    pub max_vertex_count: usize,
}

/// Geometry wrapped together with a flat material
struct BenchMesh {
    geometry: GeometryBuffers,
    color: [f32; 3],
}

fn boxed(width_segments: u32, height_segments: u32, depth_segments: u32) -> GeometryParams {
    GeometryParams::Box {
        width: 1.0,
        height: 1.0,
        depth: 1.0,
        width_segments,
        height_segments,
        depth_segments,
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryParams {
    GeometryParams::Sphere {
        radius,
        width_segments,
        height_segments,
    }
}

fn cylinder(radius: f32, radial_segments: u32, height_segments: u32) -> GeometryParams {
    GeometryParams::Cylinder {
        radius_top: radius,
        radius_bottom: radius,
        height: 1.0,
        radial_segments,
        height_segments,
    }
}

fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryParams {
    GeometryParams::Plane {
        width,
        height,
        width_segments,
        height_segments,
    }
}

fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> GeometryParams {
    GeometryParams::Torus {
        radius,
        tube,
        radial_segments,
        tubular_segments,
    }
}

/// Benchmark configs for `mode`; `rng` is only drawn from in random mode
pub fn geometry_presets<R: Rng + ?Sized>(mode: BenchMode, rng: &mut R) -> Vec<GeometryParams> {
    match mode {
        BenchMode::Basic => vec![
            boxed(1, 1, 1),
            sphere(1.0, 8, 6),
            cylinder(1.0, 8, 1),
            plane(10.0, 10.0, 1, 1),
            torus(1.0, 0.4, 8, 24),
        ],
        BenchMode::All => vec![
            boxed(1, 1, 1),
            boxed(5, 5, 5),
            sphere(1.0, 8, 6),
            sphere(1.0, 16, 12),
            cylinder(1.0, 8, 1),
            cylinder(1.0, 16, 1),
            plane(10.0, 10.0, 1, 1),
            plane(10.0, 10.0, 10, 10),
            torus(1.0, 0.4, 8, 24),
            torus(1.0, 0.4, 12, 48),
        ],
        BenchMode::Extreme => {
            let mut configs: Vec<GeometryParams> =
                [1, 5, 10, 20, 40].iter().map(|&s| boxed(s, s, s)).collect();
            configs.extend([(16, 1), (32, 24), (64, 48), (128, 96)].map(|(w, h)| sphere(1.0, w, h)));
            configs.extend([(16, 4), (32, 8), (64, 16), (128, 32)].map(|(r, h)| cylinder(1.0, r, h)));
            configs.extend([1, 50, 100, 200].map(|s| plane(10.0, 10.0, s, s)));
            configs.extend([(16, 96), (32, 192), (64, 384), (128, 768)].map(|(r, t)| torus(1.0, 0.4, r, t)));
            configs
        }
        BenchMode::Random => {
            let mut configs = Vec::with_capacity(500);
            for _ in 0..100 {
                configs.push(boxed(
                    rng.gen_range(1..=40),
                    rng.gen_range(1..=40),
                    rng.gen_range(1..=40),
                ));
            }
            for _ in 0..100 {
                configs.push(sphere(
                    rng.gen_range(1..=10) as f32,
                    rng.gen_range(1..=200),
                    rng.gen_range(1..=200),
                ));
            }
            for _ in 0..100 {
                configs.push(cylinder(
                    rng.gen_range(1..=10) as f32,
                    rng.gen_range(1..=200),
                    rng.gen_range(1..=200),
                ));
            }
            for _ in 0..100 {
                configs.push(plane(
                    rng.gen_range(1..=10) as f32,
                    rng.gen_range(1..=10) as f32,
                    rng.gen_range(1..=200),
                    rng.gen_range(1..=200),
                ));
            }
            for _ in 0..100 {
                configs.push(torus(
                    rng.gen_range(1..=10) as f32,
                    rng.gen_range(1..=10) as f32,
                    rng.gen_range(1..=200),
                    rng.gen_range(1..=200),
                ));
            }
            configs
        }
    }
}

/// Time geometry construction and mesh wrapping for one config
pub fn measure_geometry(params: GeometryParams) -> GeometryTestResult {
    let started = Instant::now();
    let geometry = black_box(params.build());
    let geometry_time = elapsed_ms(started);

    let started = Instant::now();
    let mesh = black_box(BenchMesh {
        geometry,
        color: [1.0, 0.0, 0.0],
    });
    let mesh_time = elapsed_ms(started);

    let vertex_count = mesh.geometry.vertex_count();
    black_box(&mesh.color);

    GeometryTestResult {
        kind: params.kind(),
        parameters: params,
        vertex_count,
        geometry_instance_creation_time_ms: geometry_time,
        mesh_instancing_time_ms: mesh_time,
    }
}

/// Run every preset of `mode`
pub fn run_geometry_benchmark<R: Rng + ?Sized>(
    mode: BenchMode,
    rng: &mut R,
) -> Vec<GeometryTestResult> {
    let configs = geometry_presets(mode, rng);
    tracing::info!("running {} geometry benchmark: {} configs", mode, configs.len());
    configs.into_iter().map(measure_geometry).collect()
}

/// Per-kind summary, ordered by kind name
pub fn summarize_geometry(results: &[GeometryTestResult]) -> Vec<GeometrySummary> {
    let mut by_kind: BTreeMap<&'static str, Vec<&GeometryTestResult>> = BTreeMap::new();
    for result in results {
        by_kind.entry(result.kind).or_default().push(result);
    }

    by_kind
        .into_iter()
        .map(|(kind, samples)| {
            let n = samples.len() as f64;
            GeometrySummary {
                kind,
                samples: samples.len(),
                avg_creation_time_ms: samples
                    .iter()
                    .map(|r| r.geometry_instance_creation_time_ms)
                    .sum::<f64>()
                    / n,
                avg_mesh_time_ms: samples.iter().map(|r| r.mesh_instancing_time_ms).sum::<f64>()
                    / n,
                max_vertex_count: samples.iter().map(|r| r.vertex_count).max().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_preset_sizes() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(geometry_presets(BenchMode::Basic, &mut rng).len(), 5);
        assert_eq!(geometry_presets(BenchMode::All, &mut rng).len(), 10);
        assert_eq!(geometry_presets(BenchMode::Extreme, &mut rng).len(), 21);
        assert_eq!(geometry_presets(BenchMode::Random, &mut rng).len(), 500);
    }

    #[test]
    fn test_measure_reports_vertex_count() {
        let params = boxed(2, 2, 2);
        let result = measure_geometry(params);
        assert_eq!(result.kind, "box");
        assert_eq!(result.vertex_count, params.vertex_count());
        assert!(result.geometry_instance_creation_time_ms >= 0.0);
    }

    #[test]
    fn test_summary_groups_by_kind() {
        let mut rng = StdRng::seed_from_u64(3);
        let results = run_geometry_benchmark(BenchMode::All, &mut rng);
        let summary = summarize_geometry(&results);

        let kinds: Vec<&str> = summary.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec!["box", "cylinder", "plane", "sphere", "torus"]);
        assert!(summary.iter().all(|s| s.samples == 2));
        let plane = summary.iter().find(|s| s.kind == "plane").unwrap();
        assert_eq!(plane.max_vertex_count, 121);
    }
}
