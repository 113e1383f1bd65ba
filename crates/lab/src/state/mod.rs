pub mod scene;
pub mod settings;
pub mod signal;

pub use scene::{object_display_name, outline, short_id, SceneStore};
pub use settings::{BenchSettings, LabSettings, RandomSceneSettings, ReportSettings};
pub use signal::ResetSignal;
