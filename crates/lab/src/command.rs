//! JSON command protocol driving the lab harness.

use serde::{Deserialize, Serialize};
use shared::ObjectPatch;

use crate::harness::LabHarness;
use crate::state::{object_display_name, short_id};

/// A command the lab can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum LabCommand {
    /// Replace the scene with the canonical single-object scene
    ResetScene,
    /// Replace the scene with a random forest
    RandomizeScene {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Add an object under a parent, or at the root
    AddObject {
        #[serde(default)]
        parent_id: Option<String>,
        #[serde(default)]
        patch: ObjectPatch,
    },
    /// Remove an object and its subtree
    RemoveObject { id: String },
    /// Merge a patch into an object
    UpdateObject { id: String, patch: ObjectPatch },
    /// Move an object under a new parent, or to the root
    ReparentObject {
        id: String,
        #[serde(default)]
        new_parent_id: Option<String>,
    },
    ToggleVisibility { id: String },
    /// Run one render pass
    Render,
    /// Clear the tracker's change flags
    ResetTracker,
    /// List every object depth-first
    Inspect,
    /// Identity report
    Report,
    /// Export the scene as JSON
    ExportScene,
    /// Attach an externally measured GPU upload time to an object's latest sample
    RecordGpuUpload { id: String, time_ms: f64 },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn to_value(value: impl Serialize) -> CommandResponse {
    match serde_json::to_value(value) {
        Ok(data) => CommandResponse::ok_with_data(data),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut LabHarness, cmd: LabCommand) -> CommandResponse {
    match cmd {
        LabCommand::ResetScene => {
            harness.reset_scene();
            CommandResponse::ok()
        }

        LabCommand::RandomizeScene { seed } => {
            match seed {
                Some(seed) => harness.randomize_scene_seeded(seed),
                None => harness.randomize_scene(),
            }
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": harness.object_count(),
            }))
        }

        LabCommand::AddObject { parent_id, patch } => {
            match harness.add_object_with(parent_id.as_deref(), patch) {
                Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
                // Missing parent is a no-op, not a failure
                None => CommandResponse::ok_with_data(serde_json::json!({ "id": null })),
            }
        }

        LabCommand::RemoveObject { id } => {
            let removed = harness.remove(&id);
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        LabCommand::UpdateObject { id, patch } => {
            let updated = harness.update(&id, &patch);
            CommandResponse::ok_with_data(serde_json::json!({ "updated": updated }))
        }

        LabCommand::ReparentObject { id, new_parent_id } => {
            match harness.reparent(&id, new_parent_id.as_deref()) {
                Ok(moved) => CommandResponse::ok_with_data(serde_json::json!({ "moved": moved })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        LabCommand::ToggleVisibility { id } => {
            let toggled = harness.toggle_visibility(&id);
            let visible = harness.scene.get_object(&id).map(|obj| obj.visible);
            CommandResponse::ok_with_data(serde_json::json!({
                "toggled": toggled,
                "visible": visible,
            }))
        }

        LabCommand::Render => to_value(harness.render()),

        LabCommand::ResetTracker => {
            harness.reset_tracker();
            CommandResponse::ok()
        }

        LabCommand::Inspect => {
            let objects: Vec<serde_json::Value> = harness
                .scene
                .data()
                .iter()
                .map(|obj| {
                    serde_json::json!({
                        "id": obj.id,
                        "short_id": short_id(&obj.id),
                        "display_name": object_display_name(obj),
                        "geometry_type": obj.geometry_type,
                        "material_type": obj.material_type,
                        "visible": obj.visible,
                        "child_count": obj.children.len(),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "root_count": harness.root_count(),
                "version": harness.scene.version(),
                "objects": objects,
            }))
        }

        LabCommand::Report => to_value(harness.report()),

        LabCommand::ExportScene => match harness.export_scene_json() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        LabCommand::RecordGpuUpload { id, time_ms } => {
            let recorded = harness.metrics.record_gpu_upload(&id, time_ms);
            let avg_gpu_time_ms = harness
                .metrics
                .aggregated()
                .and_then(|agg| agg.avg_gpu_time_ms);
            CommandResponse::ok_with_data(serde_json::json!({
                "recorded": recorded,
                "avg_gpu_time_ms": avg_gpu_time_ms,
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut LabHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: LabCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut LabHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<LabCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
