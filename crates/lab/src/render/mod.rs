//! Headless scene renderer
//!
//! Stands in for the declarative binding layer: walks the scene tree, reuses
//! or recreates render primitives the way that layer does, and registers each
//! of them with the identity tracker.
//!
//! Reuse rules:
//! - an object's render id is its parent's render id plus its own id; the
//!   object primitive lives as long as the render id is stable, so moving a
//!   node recreates its whole subtree while type changes do not;
//! - geometry is keyed by render id and geometry type, material by render id
//!   and material type, so a type change only swaps that one primitive;
//! - a color change updates the material in place;
//! - hidden objects are unmounted together with their subtree;
//! - primitives whose key disappeared are disposed after the pass.

pub mod geometry;
mod primitives;

pub use geometry::{GeometryBuffers, GeometryParams};
pub use primitives::{AttributeSet, GeometryInstance, MaterialInstance, ObjectInstance};

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use serde::Serialize;
use shared::{ObjectId, SceneData, SceneObject};

use crate::metrics::{elapsed_ms, now_millis, ObjectPerformanceMetrics, PerformanceTracker};
use crate::tracking::{HandleAllocator, IdentityTracker};

/// Counters for one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub pass: u64,
    pub objects_created: usize,
    pub objects_reused: usize,
    pub geometries_created: usize,
    pub geometries_reused: usize,
    pub materials_created: usize,
    pub materials_reused: usize,
    /// Primitives dropped because their render id disappeared
    pub disposed: usize,
    /// Objects skipped because they or an ancestor are hidden
    pub hidden: usize,
}

struct Pass {
    live: HashSet<String>,
    stats: RenderStats,
}

/// Keys of the primitives backing one object
#[derive(Debug, Clone)]
struct Binding {
    render_id: String,
    geometry_key: String,
    material_key: String,
}

/// Retained render primitives: objects keyed by render id, geometries and
/// materials by render id plus type
#[derive(Debug, Default)]
pub struct SceneRenderer {
    handles: HandleAllocator,
    objects: HashMap<String, ObjectInstance>,
    geometries: HashMap<String, GeometryInstance>,
    materials: HashMap<String, MaterialInstance>,
    /// Object id -> primitive keys of the last pass
    bindings: HashMap<ObjectId, Binding>,
    passes: u64,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile retained primitives against `scene` and register them with `tracker`
    pub fn render(
        &mut self,
        scene: &SceneData,
        tracker: &mut IdentityTracker,
        metrics: &mut PerformanceTracker,
    ) -> RenderStats {
        self.passes += 1;
        self.bindings.clear();
        let mut pass = Pass {
            live: HashSet::new(),
            stats: RenderStats {
                pass: self.passes,
                ..Default::default()
            },
        };

        for object in &scene.root {
            self.render_object(object, "", tracker, metrics, &mut pass);
        }

        let before = self.primitive_count();
        self.objects.retain(|key, _| pass.live.contains(key));
        self.geometries.retain(|key, _| pass.live.contains(key));
        self.materials.retain(|key, _| pass.live.contains(key));
        pass.stats.disposed = before - self.primitive_count();

        tracing::debug!(
            "render pass {}: {} objects created, {} reused, {} primitives disposed",
            pass.stats.pass,
            pass.stats.objects_created,
            pass.stats.objects_reused,
            pass.stats.disposed
        );
        pass.stats
    }

    fn render_object(
        &mut self,
        object: &SceneObject,
        parent_render_id: &str,
        tracker: &mut IdentityTracker,
        metrics: &mut PerformanceTracker,
        pass: &mut Pass,
    ) {
        if !object.visible {
            pass.stats.hidden += object.subtree_len();
            return;
        }

        let render_id = format!("{parent_render_id}/{}", object.id);
        let geometry_key = format!("{render_id}:{}", object.geometry_type);
        let material_key = format!("{render_id}:{}", object.material_type);
        pass.live.insert(render_id.clone());
        pass.live.insert(geometry_key.clone());
        pass.live.insert(material_key.clone());
        self.bindings.insert(
            object.id.clone(),
            Binding {
                render_id: render_id.clone(),
                geometry_key: geometry_key.clone(),
                material_key: material_key.clone(),
            },
        );

        let started = Instant::now();
        let handles = &mut self.handles;

        let object_created = !self.objects.contains_key(&render_id);
        let instance = self
            .objects
            .entry(render_id.clone())
            .or_insert_with(|| ObjectInstance::new(handles, render_id.clone()));
        tracker.register_object(&object.id, instance);
        let object_type = instance.object_type();

        let geometry_started = Instant::now();
        let geometry_created = !self.geometries.contains_key(&geometry_key);
        let geometry = self
            .geometries
            .entry(geometry_key)
            .or_insert_with(|| GeometryInstance::build(handles, object.geometry_type));
        let geometry_time = elapsed_ms(geometry_started);
        tracker.register_geometry(&object.id, object.geometry_type, geometry);
        let vertex_count = geometry.vertex_count();
        let attribute_count = geometry.attribute_count();

        let material_started = Instant::now();
        let material_created = !self.materials.contains_key(&material_key);
        let material = self
            .materials
            .entry(material_key)
            .or_insert_with(|| MaterialInstance::new(handles, object.material_type, &object.color));
        if material.color != object.color {
            material.color = object.color.clone();
        }
        let material_time = elapsed_ms(material_started);
        tracker.register_material(&object.id, object.material_type, material);

        let stats = &mut pass.stats;
        if object_created {
            stats.objects_created += 1;
            let creation_time = elapsed_ms(started);
            metrics.record(ObjectPerformanceMetrics {
                id: object.id.clone(),
                name: object.name.clone(),
                object_type: object_type.to_string(),
                geometry_type: object.geometry_type,
                material_type: object.material_type,
                creation_time_ms: creation_time,
                geometry_init_time_ms: if geometry_created { geometry_time } else { 0.0 },
                material_init_time_ms: if material_created { material_time } else { 0.0 },
                gpu_upload_time_ms: None,
                total_setup_time_ms: creation_time,
                total_vertices: vertex_count,
                attribute_count,
                timestamp: now_millis(),
            });
        } else {
            stats.objects_reused += 1;
        }
        if geometry_created {
            stats.geometries_created += 1;
        } else {
            stats.geometries_reused += 1;
        }
        if material_created {
            stats.materials_created += 1;
        } else {
            stats.materials_reused += 1;
        }

        for child in &object.children {
            self.render_object(child, &render_id, tracker, metrics, pass);
        }
    }

    /// Number of passes rendered so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Live object primitives
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn primitive_count(&self) -> usize {
        self.objects.len() + self.geometries.len() + self.materials.len()
    }

    /// Object primitive currently bound to `object_id`
    pub fn object_for(&self, object_id: &str) -> Option<&ObjectInstance> {
        self.bindings
            .get(object_id)
            .and_then(|binding| self.objects.get(&binding.render_id))
    }

    /// Geometry currently bound to `object_id`
    pub fn geometry_for(&self, object_id: &str) -> Option<&GeometryInstance> {
        self.bindings
            .get(object_id)
            .and_then(|binding| self.geometries.get(&binding.geometry_key))
    }

    /// Material currently bound to `object_id`
    pub fn material_for(&self, object_id: &str) -> Option<&MaterialInstance> {
        self.bindings
            .get(object_id)
            .and_then(|binding| self.materials.get(&binding.material_key))
    }
}
