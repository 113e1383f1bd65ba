//! Parametric geometry generation
//!
//! Vertex layouts follow the usual indexed-grid construction: every grid is
//! `(segments_u + 1) * (segments_v + 1)` vertices, caps add a centre vertex per
//! segment plus a closing ring.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use shared::GeometryType;

/// Geometry construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryParams {
    Box {
        width: f32,
        height: f32,
        depth: f32,
        width_segments: u32,
        height_segments: u32,
        depth_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// A cone is a cylinder with `radius_top == 0`
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
}

/// Generated vertex attributes
#[derive(Debug, Clone, Default)]
pub struct GeometryBuffers {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

impl GeometryBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Names of the attribute arrays this buffer carries
    pub fn attribute_names(&self) -> &'static [&'static str] {
        &["position", "uv"]
    }

    fn push(&mut self, position: [f32; 3], uv: [f32; 2]) {
        self.positions.push(position);
        self.uvs.push(uv);
    }

    /// `(grid_x + 1) * (grid_y + 1)` vertices, `map` receives normalized (u, v)
    fn push_grid(&mut self, grid_x: u32, grid_y: u32, map: impl Fn(f32, f32) -> [f32; 3]) {
        for iy in 0..=grid_y {
            let v = iy as f32 / grid_y as f32;
            for ix in 0..=grid_x {
                let u = ix as f32 / grid_x as f32;
                self.push(map(u, v), [u, 1.0 - v]);
            }
        }
    }
}

impl GeometryParams {
    /// Parameters used when rendering a scene object of this type
    pub fn for_scene(geometry_type: GeometryType) -> Self {
        match geometry_type {
            GeometryType::Box => GeometryParams::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
                width_segments: 1,
                height_segments: 1,
                depth_segments: 1,
            },
            GeometryType::Sphere => GeometryParams::Sphere {
                radius: 0.5,
                width_segments: 32,
                height_segments: 32,
            },
            GeometryType::Cylinder => GeometryParams::Cylinder {
                radius_top: 0.5,
                radius_bottom: 0.5,
                height: 1.0,
                radial_segments: 32,
                height_segments: 1,
            },
            GeometryType::Cone => GeometryParams::Cylinder {
                radius_top: 0.0,
                radius_bottom: 0.5,
                height: 1.0,
                radial_segments: 32,
                height_segments: 1,
            },
            GeometryType::Torus => GeometryParams::Torus {
                radius: 0.5,
                tube: 0.2,
                radial_segments: 16,
                tubular_segments: 32,
            },
        }
    }

    /// Short kind name
    pub fn kind(&self) -> &'static str {
        match self {
            GeometryParams::Box { .. } => "box",
            GeometryParams::Sphere { .. } => "sphere",
            GeometryParams::Cylinder { .. } => "cylinder",
            GeometryParams::Plane { .. } => "plane",
            GeometryParams::Torus { .. } => "torus",
        }
    }

    /// Segment counts with the minimums applied during construction
    fn normalized(&self) -> Self {
        let mut params = *self;
        match &mut params {
            GeometryParams::Box {
                width_segments,
                height_segments,
                depth_segments,
                ..
            } => {
                *width_segments = (*width_segments).max(1);
                *height_segments = (*height_segments).max(1);
                *depth_segments = (*depth_segments).max(1);
            }
            GeometryParams::Sphere {
                width_segments,
                height_segments,
                ..
            } => {
                *width_segments = (*width_segments).max(3);
                *height_segments = (*height_segments).max(2);
            }
            GeometryParams::Cylinder {
                radial_segments,
                height_segments,
                ..
            } => {
                *radial_segments = (*radial_segments).max(3);
                *height_segments = (*height_segments).max(1);
            }
            GeometryParams::Plane {
                width_segments,
                height_segments,
                ..
            } => {
                *width_segments = (*width_segments).max(1);
                *height_segments = (*height_segments).max(1);
            }
            GeometryParams::Torus {
                radial_segments,
                tubular_segments,
                ..
            } => {
                *radial_segments = (*radial_segments).max(3);
                *tubular_segments = (*tubular_segments).max(3);
            }
        }
        params
    }

    /// Vertex count without building the buffers
    pub fn vertex_count(&self) -> usize {
        let grid = |x: u32, y: u32| (x as usize + 1) * (y as usize + 1);
        match self.normalized() {
            GeometryParams::Box {
                width_segments: ws,
                height_segments: hs,
                depth_segments: ds,
                ..
            } => 2 * (grid(ds, hs) + grid(ws, ds) + grid(ws, hs)),
            GeometryParams::Sphere {
                width_segments,
                height_segments,
                ..
            } => grid(width_segments, height_segments),
            GeometryParams::Cylinder {
                radius_top,
                radius_bottom,
                radial_segments,
                height_segments,
                ..
            } => {
                let cap = 2 * radial_segments as usize + 1;
                let caps = [radius_top, radius_bottom]
                    .iter()
                    .filter(|r| **r > 0.0)
                    .count();
                grid(radial_segments, height_segments) + caps * cap
            }
            GeometryParams::Plane {
                width_segments,
                height_segments,
                ..
            } => grid(width_segments, height_segments),
            GeometryParams::Torus {
                radial_segments,
                tubular_segments,
                ..
            } => grid(tubular_segments, radial_segments),
        }
    }

    /// Generate vertex buffers
    pub fn build(&self) -> GeometryBuffers {
        let mut out = GeometryBuffers::default();
        out.positions.reserve(self.vertex_count());
        out.uvs.reserve(self.vertex_count());

        match self.normalized() {
            GeometryParams::Box {
                width: w,
                height: h,
                depth: d,
                width_segments: ws,
                height_segments: hs,
                depth_segments: ds,
            } => {
                let (hw, hh, hd) = (w / 2.0, h / 2.0, d / 2.0);
                // +x / -x
                out.push_grid(ds, hs, |u, v| [hw, hh - v * h, hd - u * d]);
                out.push_grid(ds, hs, |u, v| [-hw, hh - v * h, u * d - hd]);
                // +y / -y
                out.push_grid(ws, ds, |u, v| [u * w - hw, hh, v * d - hd]);
                out.push_grid(ws, ds, |u, v| [u * w - hw, -hh, hd - v * d]);
                // +z / -z
                out.push_grid(ws, hs, |u, v| [u * w - hw, hh - v * h, hd]);
                out.push_grid(ws, hs, |u, v| [hw - u * w, hh - v * h, -hd]);
            }
            GeometryParams::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                out.push_grid(width_segments, height_segments, |u, v| {
                    let (phi, theta) = (u * TAU, v * PI);
                    [
                        -radius * phi.cos() * theta.sin(),
                        radius * theta.cos(),
                        radius * phi.sin() * theta.sin(),
                    ]
                });
            }
            GeometryParams::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
            } => {
                let half = height / 2.0;
                out.push_grid(radial_segments, height_segments, |u, v| {
                    let radius = v * (radius_bottom - radius_top) + radius_top;
                    let theta = u * TAU;
                    [radius * theta.sin(), half - v * height, radius * theta.cos()]
                });
                for (radius, y) in [(radius_top, half), (radius_bottom, -half)] {
                    if radius > 0.0 {
                        push_cap(&mut out, radial_segments, radius, y);
                    }
                }
            }
            GeometryParams::Plane {
                width,
                height,
                width_segments,
                height_segments,
            } => {
                out.push_grid(width_segments, height_segments, |u, v| {
                    [u * width - width / 2.0, height / 2.0 - v * height, 0.0]
                });
            }
            GeometryParams::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => {
                out.push_grid(tubular_segments, radial_segments, |u, v| {
                    let (around, across) = (u * TAU, v * TAU);
                    let ring = radius + tube * across.cos();
                    [ring * around.cos(), ring * around.sin(), tube * across.sin()]
                });
            }
        }

        out
    }
}

/// Cap: one centre vertex per segment, then the closing ring
fn push_cap(out: &mut GeometryBuffers, segments: u32, radius: f32, y: f32) {
    for _ in 0..segments {
        out.push([0.0, y, 0.0], [0.5, 0.5]);
    }
    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        out.push(
            [radius * sin, y, radius * cos],
            [cos * 0.5 + 0.5, sin * 0.5 + 0.5],
        );
    }
}
