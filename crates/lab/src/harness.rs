//! Headless lab harness for programmatic scene manipulation.
//!
//! Owns the scene store, the identity tracker, the renderer and the metrics
//! log, and threads them through each other explicitly.

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{ObjectId, ObjectPatch, SceneData};

use crate::error::SceneError;
use crate::metrics::PerformanceTracker;
use crate::render::{RenderStats, SceneRenderer};
use crate::report::IdentityReport;
use crate::state::{LabSettings, ResetSignal, SceneStore};
use crate::tracking::IdentityTracker;

/// Headless lab: scene, tracker, renderer and metrics
#[derive(Debug)]
pub struct LabHarness {
    pub scene: SceneStore,
    pub tracker: IdentityTracker,
    pub renderer: SceneRenderer,
    pub metrics: PerformanceTracker,
    pub reset_signal: ResetSignal,
    pub settings: LabSettings,
    last_render: Option<RenderStats>,
    /// Scene version seen by the last render
    rendered_version: Option<u64>,
}

impl LabHarness {
    /// Create a harness with an empty scene and default settings.
    pub fn new() -> Self {
        Self::with_settings(LabSettings::default())
    }

    pub fn with_settings(settings: LabSettings) -> Self {
        Self {
            scene: SceneStore::default(),
            tracker: IdentityTracker::new(),
            renderer: SceneRenderer::new(),
            metrics: PerformanceTracker::new(),
            reset_signal: ResetSignal::default(),
            settings,
            last_render: None,
            rendered_version: None,
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    pub fn reset_scene(&mut self) {
        self.scene.reset_scene();
    }

    /// Random scene using the configured generation settings
    pub fn randomize_scene(&mut self) {
        self.scene
            .randomize_scene_with(&mut rand::thread_rng(), &self.settings.scene);
    }

    /// Reproducible random scene
    pub fn randomize_scene_seeded(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.scene.randomize_scene_with(&mut rng, &self.settings.scene);
    }

    /// Add a named box under `parent_id` (or at the root)
    pub fn add_object(&mut self, parent_id: Option<&str>, name: &str) -> Option<ObjectId> {
        self.scene.add_object(parent_id, ObjectPatch::named(name))
    }

    pub fn add_object_with(
        &mut self,
        parent_id: Option<&str>,
        patch: ObjectPatch,
    ) -> Option<ObjectId> {
        self.scene.add_object(parent_id, patch)
    }

    /// First object named `name`, depth-first
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.scene
            .data()
            .iter()
            .find(|obj| obj.name == name)
            .map(|obj| obj.id.clone())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.scene.remove_object(id)
    }

    pub fn update(&mut self, id: &str, patch: &ObjectPatch) -> bool {
        self.scene.update_object(id, patch)
    }

    pub fn reparent(&mut self, id: &str, new_parent_id: Option<&str>) -> Result<bool, SceneError> {
        self.scene.reparent_object(id, new_parent_id)
    }

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        self.scene.toggle_visibility(id)
    }

    /// Load a scene (replaces current)
    pub fn load_scene(&mut self, data: SceneData) -> Result<(), SceneError> {
        self.scene.set_scene(data)
    }

    /// Load a scene from JSON string
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), SceneError> {
        let data: SceneData = serde_json::from_str(json)?;
        self.load_scene(data)
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self.scene.data())?)
    }

    // ── Rendering + tracking ──────────────────────────────────

    /// Run one render pass over the current scene
    pub fn render(&mut self) -> RenderStats {
        let stats = self
            .renderer
            .render(self.scene.data(), &mut self.tracker, &mut self.metrics);
        self.rendered_version = Some(self.scene.version());
        self.last_render = Some(stats);
        stats
    }

    /// Render only when the scene version moved since the last pass
    pub fn render_if_changed(&mut self) -> Option<RenderStats> {
        if self.rendered_version == Some(self.scene.version()) {
            return None;
        }
        Some(self.render())
    }

    pub fn last_render(&self) -> Option<RenderStats> {
        self.last_render
    }

    /// Clear change flags and tell subscribers about it
    pub fn reset_tracker(&mut self) {
        self.tracker.clear_tracked_objects();
        self.reset_signal.notify();
    }

    pub fn report(&self) -> IdentityReport {
        IdentityReport::build(self.scene.data(), &self.tracker)
    }

    // ── Inspection ────────────────────────────────────────────

    /// Number of objects anywhere in the tree
    pub fn object_count(&self) -> usize {
        self.scene.object_count()
    }

    pub fn root_count(&self) -> usize {
        self.scene.root().len()
    }
}

impl Default for LabHarness {
    fn default() -> Self {
        Self::new()
    }
}
