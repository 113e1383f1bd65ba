use std::hint::black_box;
use std::time::Instant;

use rand::Rng;
use serde::Serialize;

use crate::metrics::elapsed_ms;

/// Texture dimensions for one material sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextureParams {
    pub width: u32,
    pub height: u32,
}

/// One material benchmark sample
#[derive(Debug, Clone, Serialize)]
pub struct MaterialTestResult {
    pub kind: String,
    pub width: u32,
    pub height: u32,
    /// Texel count
    pub texture_size: u64,
    pub texture_creation_time_ms: f64,
    pub material_creation_time_ms: f64,
}

struct DataTexture {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

struct TexturedMaterial {
    map: DataTexture,
    transparent: bool,
}

/// Red-to-green horizontal gradient, RGBA8
fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    let span = width.saturating_sub(1).max(1) as f32;
    for _ in 0..height {
        for x in 0..width {
            let t = x as f32 / span;
            data.extend_from_slice(&[((1.0 - t) * 255.0) as u8, (t * 255.0) as u8, 0, 255]);
        }
    }
    data
}

/// `count` random sizes with each side in `1..=max_side`
pub fn random_texture_params<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    max_side: u32,
) -> Vec<TextureParams> {
    let max_side = max_side.max(1);
    (0..count)
        .map(|_| TextureParams {
            width: rng.gen_range(1..=max_side),
            height: rng.gen_range(1..=max_side),
        })
        .collect()
}

/// Time texture upload and material construction for one size.
///
/// Filling the pixel buffer is not part of either timing.
pub fn measure_material(kind: &str, params: TextureParams) -> MaterialTestResult {
    let data = gradient(params.width, params.height);

    let started = Instant::now();
    let texture = black_box(DataTexture {
        width: params.width,
        height: params.height,
        data,
    });
    let texture_time = elapsed_ms(started);

    let started = Instant::now();
    let material = black_box(TexturedMaterial {
        map: texture,
        transparent: false,
    });
    let material_time = elapsed_ms(started);

    black_box(material.transparent);
    let texture_size = material.map.width as u64 * material.map.height as u64;
    debug_assert_eq!(material.map.data.len() as u64, texture_size * 4);

    MaterialTestResult {
        kind: kind.to_string(),
        width: params.width,
        height: params.height,
        texture_size,
        texture_creation_time_ms: texture_time,
        material_creation_time_ms: material_time,
    }
}

/// Measure `count` random texture sizes
pub fn run_material_benchmark<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    max_side: u32,
) -> Vec<MaterialTestResult> {
    let params = random_texture_params(rng, count, max_side);
    tracing::info!(
        "running material benchmark: {} samples, max side {}",
        params.len(),
        max_side
    );
    params
        .into_iter()
        .map(|p| measure_material("MeshBasicMaterial", p))
        .collect()
}
