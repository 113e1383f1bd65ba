use std::path::PathBuf;

use shared::ObjectId;

/// Errors surfaced by the scene store and the harness around it.
///
/// Lookups of missing objects are not errors: they are silent no-ops.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("cannot move object {object_id} under its own descendant {new_parent_id}")]
    CyclicReparent {
        object_id: ObjectId,
        new_parent_id: ObjectId,
    },
    #[error("duplicate object id {0}")]
    DuplicateId(ObjectId),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
