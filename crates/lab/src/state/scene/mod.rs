//! Scene store
//!
//! Owns the scene tree and exposes structural mutations. Every mutation
//! rebuilds the root sequence (copy-on-write along the mutated path) and bumps
//! both the timestamp and the version counter, which are the only change
//! signals observers rely on.

mod display;
mod generate;
mod hierarchy;
mod object_ops;

pub use display::{object_display_name, object_icon, outline, short_id};
pub use generate::{random_color, random_object};
pub use hierarchy::find_path;

use std::collections::HashSet;

use shared::{SceneData, SceneObject};

use crate::error::SceneError;
use crate::metrics::now_millis;

/// Scene state with change tracking
#[derive(Debug)]
pub struct SceneStore {
    /// Current scene tree
    pub(crate) data: SceneData,
    /// Monotonically increasing version counter
    pub(crate) version: u64,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self {
            data: SceneData {
                root: Vec::new(),
                last_update_timestamp: now_millis(),
            },
            version: 0,
        }
    }
}

impl SceneStore {
    /// Current scene
    pub fn data(&self) -> &SceneData {
        &self.data
    }

    /// Root objects
    pub fn root(&self) -> &[SceneObject] {
        &self.data.root
    }

    /// Timestamp of the last mutation (ms since UNIX epoch)
    pub fn last_update_timestamp(&self) -> u64 {
        self.data.last_update_timestamp
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get an object anywhere in the tree
    pub fn get_object(&self, id: &str) -> Option<&SceneObject> {
        self.data.find(id)
    }

    /// Total number of objects in the tree
    pub fn object_count(&self) -> usize {
        self.data.object_count()
    }

    /// Replace the whole scene (e.g. loaded from JSON).
    ///
    /// Ids must be unique across the tree; otherwise the store is left as is.
    pub fn set_scene(&mut self, data: SceneData) -> Result<(), SceneError> {
        let duplicate = {
            let mut seen = HashSet::new();
            data.iter()
                .find(|obj| !seen.insert(obj.id.as_str()))
                .map(|obj| obj.id.clone())
        };
        if let Some(id) = duplicate {
            return Err(SceneError::DuplicateId(id));
        }
        self.commit(data.root);
        Ok(())
    }

    /// Install a new root sequence and bump the change markers
    pub(crate) fn commit(&mut self, root: Vec<SceneObject>) {
        self.data.root = root;
        // Strictly increasing, even for two mutations within one millisecond
        self.data.last_update_timestamp = now_millis().max(self.data.last_update_timestamp + 1);
        self.version += 1;
    }
}

/// Rebuild `objects`, replacing the node with `id` by `f(node)`.
/// Nodes off the path to the match are copied unchanged.
pub(crate) fn rewrite(
    objects: &[SceneObject],
    id: &str,
    f: &mut impl FnMut(&SceneObject) -> SceneObject,
) -> Vec<SceneObject> {
    objects
        .iter()
        .map(|obj| {
            if obj.id == id {
                f(obj)
            } else if obj.children.is_empty() {
                obj.clone()
            } else {
                obj.with_children(rewrite(&obj.children, id, f))
            }
        })
        .collect()
}
