use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use scene_lab_lib::bench::{
    run_geometry_benchmark, run_material_benchmark, summarize_geometry, BenchMode,
};
use scene_lab_lib::command::execute_json_batch;
use scene_lab_lib::harness::LabHarness;
use scene_lab_lib::state::{outline, LabSettings};

#[derive(Debug, Default)]
struct Args {
    settings: Option<PathBuf>,
    bench: Option<BenchMode>,
    commands: Option<PathBuf>,
    seed: Option<u64>,
}

fn main() {
    let args = parse_args();

    let mut settings_error = None;
    let settings = match &args.settings {
        Some(path) => LabSettings::load_from(path).unwrap_or_else(|e| {
            settings_error = Some(e);
            LabSettings::default()
        }),
        None => LabSettings::load(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.as_str().into()),
        )
        .init();

    if let Some(e) = settings_error {
        tracing::error!("Failed to load settings, using defaults: {e}");
    }

    if let Some(mode) = args.bench {
        run_benchmarks(mode, args.seed.or(settings.bench.seed), &settings);
    } else if let Some(path) = &args.commands {
        run_commands(path, settings);
    } else {
        run_demo(settings, args.seed);
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let raw: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        let value = raw.get(i + 1);
        match (raw[i].as_str(), value) {
            ("--settings", Some(path)) => args.settings = Some(PathBuf::from(path)),
            ("--commands", Some(path)) => args.commands = Some(PathBuf::from(path)),
            ("--bench", Some(mode)) => match mode.parse() {
                Ok(mode) => args.bench = Some(mode),
                Err(e) => eprintln!("{e}"),
            },
            ("--seed", Some(seed)) => match seed.parse() {
                Ok(seed) => args.seed = Some(seed),
                Err(e) => eprintln!("invalid seed {seed}: {e}"),
            },
            (other, _) => {
                eprintln!("ignoring argument {other}");
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    args
}

fn run_benchmarks(mode: BenchMode, seed: Option<u64>, settings: &LabSettings) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let results = run_geometry_benchmark(mode, &mut rng);
    println!("geometry benchmark ({mode}, {} configs)", results.len());
    for summary in summarize_geometry(&results) {
        println!(
            "  {:<9} n={:<4} create {:>8.3}ms  mesh {:>8.3}ms  max vertices {}",
            summary.kind,
            summary.samples,
            summary.avg_creation_time_ms,
            summary.avg_mesh_time_ms,
            summary.max_vertex_count
        );
    }

    let results = run_material_benchmark(
        &mut rng,
        settings.bench.material_samples,
        settings.bench.max_texture_side,
    );
    if results.is_empty() {
        return;
    }
    let n = results.len() as f64;
    let texture = results.iter().map(|r| r.texture_creation_time_ms).sum::<f64>() / n;
    let material = results.iter().map(|r| r.material_creation_time_ms).sum::<f64>() / n;
    let largest = results.iter().map(|r| r.texture_size).max().unwrap_or(0);
    println!(
        "material benchmark ({} samples): texture {texture:.3}ms  material {material:.3}ms  largest {largest} texels",
        results.len()
    );
}

fn run_commands(path: &Path, settings: LabSettings) {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to read command file {}: {e}", path.display());
            return;
        }
    };

    let mut harness = LabHarness::with_settings(settings);
    match execute_json_batch(&mut harness, &json) {
        Ok(responses) => {
            tracing::info!("Executed {} commands from {}", responses.len(), path.display());
            for response in responses {
                match serde_json::to_string_pretty(&response) {
                    Ok(text) => println!("{text}"),
                    Err(e) => tracing::error!("Failed to serialize response: {e}"),
                }
            }
        }
        Err(e) => tracing::error!("{e}"),
    }
}

fn run_demo(settings: LabSettings, seed: Option<u64>) {
    let report_settings = settings.report.clone();
    let mut harness = LabHarness::with_settings(settings);

    match seed {
        Some(seed) => harness.randomize_scene_seeded(seed),
        None => harness.reset_scene(),
    }
    let stats = harness.render();
    println!("initial scene:");
    for line in outline(harness.scene.root()) {
        println!("  {line}");
    }
    println!("render: {stats:?}");

    let Some(first) = harness.scene.root().first().map(|obj| obj.id.clone()) else {
        return;
    };
    let sibling = harness.add_object(None, "Sibling");
    if let Some(sibling) = sibling.as_deref() {
        if let Err(e) = harness.reparent(&first, Some(sibling)) {
            tracing::warn!("{e}");
        }
    }
    let stats = harness.render();
    println!("after moving {first} under a new sibling:");
    for line in outline(harness.scene.root()) {
        println!("  {line}");
    }
    println!("render: {stats:?}");

    for line in harness.report().to_lines(&report_settings) {
        println!("{line}");
    }
    if let Some(metrics) = harness.metrics.aggregated() {
        println!(
            "{} objects created, avg {:.3}ms, {} vertices",
            metrics.total_objects, metrics.avg_creation_time_ms, metrics.total_vertices
        );
    }
}
