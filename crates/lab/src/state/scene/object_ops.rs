//! Object CRUD operations

use rand::Rng;
use shared::{ObjectId, ObjectPatch, SceneObject};

use super::{rewrite, SceneStore};

impl SceneStore {
    /// Add a new object under `parent_id`, or at the root when `None`.
    ///
    /// Unset fields take defaults (box, normal material, white, visible).
    /// Returns `None` without touching the scene when the parent does not exist.
    pub fn add_object(&mut self, parent_id: Option<&str>, patch: ObjectPatch) -> Option<ObjectId> {
        if let Some(parent_id) = parent_id {
            if self.get_object(parent_id).is_none() {
                tracing::debug!("add_object: parent {parent_id} not found");
                return None;
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let mut patch = patch;
        if patch.name.is_none() {
            patch.name = Some(format!("Object_{}", rand::thread_rng().gen_range(0..1000)));
        }
        let object = SceneObject::from_patch(id.clone(), patch);

        let root = match parent_id {
            None => {
                let mut root = self.data.root.clone();
                root.push(object);
                root
            }
            Some(parent_id) => rewrite(&self.data.root, parent_id, &mut |parent| {
                let mut children = parent.children.clone();
                children.push(object.clone());
                parent.with_children(children)
            }),
        };

        self.commit(root);
        tracing::debug!("added object {id}");
        Some(id)
    }

    /// Remove an object together with its whole subtree
    pub fn remove_object(&mut self, id: &str) -> bool {
        if self.get_object(id).is_none() {
            tracing::debug!("remove_object: {id} not found");
            return false;
        }

        let root = remove_from(&self.data.root, id);
        self.commit(root);
        true
    }

    /// Merge `patch` into an object. The live children are always kept.
    pub fn update_object(&mut self, id: &str, patch: &ObjectPatch) -> bool {
        if self.get_object(id).is_none() {
            tracing::debug!("update_object: {id} not found");
            return false;
        }

        let root = rewrite(&self.data.root, id, &mut |obj| obj.patched(patch));
        self.commit(root);
        true
    }

    /// Toggle object visibility
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        if self.get_object(id).is_none() {
            tracing::debug!("toggle_visibility: {id} not found");
            return false;
        }

        let root = rewrite(&self.data.root, id, &mut |obj| {
            let mut toggled = obj.with_children(obj.children.clone());
            toggled.visible = !obj.visible;
            toggled
        });
        self.commit(root);
        true
    }
}

fn remove_from(objects: &[SceneObject], id: &str) -> Vec<SceneObject> {
    objects
        .iter()
        .filter(|obj| obj.id != id)
        .map(|obj| obj.with_children(remove_from(&obj.children, id)))
        .collect()
}
