//! Identity report over the tracked objects still present in a scene

use serde::Serialize;
use shared::{GeometryType, MaterialType, ObjectId, SceneData};

use crate::state::{short_id, ReportSettings};
use crate::tracking::{IdentityTracker, UuidInfo};

/// Identity state of one scene object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityEntry {
    pub id: ObjectId,
    pub short_id: String,
    pub name: String,
    pub object: UuidInfo,
    pub object_changed: bool,
    pub geometry_type: GeometryType,
    pub geometry: UuidInfo,
    pub geometry_changed: bool,
    pub material_type: MaterialType,
    pub material: UuidInfo,
    pub material_changed: bool,
    pub attributes_changed: bool,
}

impl IdentityEntry {
    pub fn any_changed(&self) -> bool {
        self.object_changed
            || self.geometry_changed
            || self.material_changed
            || self.attributes_changed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentityReport {
    pub initialized: bool,
    /// Depth-first scene order
    pub entries: Vec<IdentityEntry>,
}

impl IdentityReport {
    /// Collect entries for every tracked id that is still in `scene`
    pub fn build(scene: &SceneData, tracker: &IdentityTracker) -> Self {
        let entries = scene
            .iter()
            .filter(|object| tracker.object_instance(&object.id).is_some())
            .map(|object| IdentityEntry {
                id: object.id.clone(),
                short_id: short_id(&object.id).to_string(),
                name: object.name.clone(),
                object: tracker.object_uuid_info(&object.id),
                object_changed: tracker.has_object_changed(&object.id),
                geometry_type: object.geometry_type,
                geometry: tracker.geometry_uuid_info(&object.id, object.geometry_type),
                geometry_changed: tracker.has_geometry_changed(&object.id),
                material_type: object.material_type,
                material: tracker.material_uuid_info(&object.id, object.material_type),
                material_changed: tracker.has_material_changed(&object.id),
                attributes_changed: tracker.has_attributes_changed(&object.id),
            })
            .collect();

        Self {
            initialized: tracker.is_initialized(),
            entries,
        }
    }

    pub fn entry(&self, id: &str) -> Option<&IdentityEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries with at least one changed primitive
    pub fn changed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.any_changed()).count()
    }

    /// Plain-text rendering
    pub fn to_lines(&self, settings: &ReportSettings) -> Vec<String> {
        if !self.initialized {
            return vec!["identity tracking not initialized".to_string()];
        }

        let mut lines = vec![format!(
            "{} tracked, {} changed",
            self.entries.len(),
            self.changed_count()
        )];
        for entry in &self.entries {
            if settings.changed_only && !entry.any_changed() {
                continue;
            }
            lines.push(format!("{} ({})", entry.name, entry.short_id));
            lines.push(uid_line("object", &entry.object, entry.object_changed, settings));
            lines.push(uid_line(
                &format!("geometry {}", entry.geometry_type),
                &entry.geometry,
                entry.geometry_changed,
                settings,
            ));
            lines.push(uid_line(
                &format!("material {}", entry.material_type),
                &entry.material,
                entry.material_changed,
                settings,
            ));
            if entry.attributes_changed {
                lines.push("  attributes CHANGED".to_string());
            }
        }
        lines
    }
}

fn uid_line(label: &str, info: &UuidInfo, changed: bool, settings: &ReportSettings) -> String {
    let mut line = format!("  {label}: {}", short_id(&info.current));
    if changed {
        line.push_str(" CHANGED");
        if settings.show_previous {
            if let Some(previous) = &info.previous {
                line.push_str(&format!(" (was {})", short_id(previous)));
            }
        }
    }
    line
}
