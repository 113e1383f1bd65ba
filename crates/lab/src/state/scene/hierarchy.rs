//! Reparenting with cycle protection

use shared::{ObjectId, SceneObject};

use super::{rewrite, SceneStore};
use crate::error::SceneError;

impl SceneStore {
    /// Move an object (with its subtree) under `new_parent_id`, or to the root when `None`.
    ///
    /// Returns `Ok(true)` when the tree changed and `Ok(false)` for no-op moves
    /// (missing object or parent, or a root object moved to the root).
    /// Moving an object under itself or one of its descendants is rejected and
    /// leaves the scene untouched.
    pub fn reparent_object(
        &mut self,
        object_id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<bool, SceneError> {
        if let Some(parent_id) = new_parent_id {
            let Some(path) = find_path(&self.data.root, parent_id) else {
                tracing::debug!("reparent_object: target parent {parent_id} not found");
                return Ok(false);
            };
            if path.iter().any(|id| id == object_id) {
                tracing::warn!("Cannot move object {object_id} to its own descendant {parent_id}");
                return Err(SceneError::CyclicReparent {
                    object_id: object_id.to_string(),
                    new_parent_id: parent_id.to_string(),
                });
            }
        }

        if new_parent_id.is_none() && self.data.root.iter().any(|obj| obj.id == object_id) {
            return Ok(false);
        }

        let Some((moved, remaining)) = detach(&self.data.root, object_id) else {
            tracing::debug!("reparent_object: {object_id} not found");
            return Ok(false);
        };

        let root = match new_parent_id {
            None => {
                let mut root = remaining;
                root.push(moved);
                root
            }
            Some(parent_id) => rewrite(&remaining, parent_id, &mut |parent| {
                let mut children = parent.children.clone();
                children.push(moved.clone());
                parent.with_children(children)
            }),
        };

        self.commit(root);
        tracing::debug!("moved {object_id} under {}", new_parent_id.unwrap_or("<root>"));
        Ok(true)
    }
}

/// IDs on the path from a root object down to `target` (both ends included)
pub fn find_path(objects: &[SceneObject], target: &str) -> Option<Vec<ObjectId>> {
    for obj in objects {
        if obj.id == target {
            return Some(vec![obj.id.clone()]);
        }
        if let Some(mut path) = find_path(&obj.children, target) {
            path.insert(0, obj.id.clone());
            return Some(path);
        }
    }
    None
}

/// Cut the node with `id` out of the tree, returning it and the remaining tree
fn detach(objects: &[SceneObject], id: &str) -> Option<(SceneObject, Vec<SceneObject>)> {
    if let Some(pos) = objects.iter().position(|obj| obj.id == id) {
        let mut remaining = objects.to_vec();
        let detached = remaining.remove(pos);
        return Some((detached, remaining));
    }

    objects.iter().enumerate().find_map(|(index, obj)| {
        let (detached, children) = detach(&obj.children, id)?;
        let mut remaining = objects.to_vec();
        remaining[index] = obj.with_children(children);
        Some((detached, remaining))
    })
}
