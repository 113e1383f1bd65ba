//! Factory functions for creating test data.
//!
//! Scene object and tree builders, plus stub primitives that can be fed to
//! the identity tracker without going through the renderer.

use shared::*;

use crate::tracking::{GeometryPrimitive, HandleAllocator, InstanceHandle, RenderPrimitive};

// ── Object factories ────────────────────────────────────────────

/// Visible box with the default material.
pub fn object(id: &str, name: &str) -> SceneObject {
    SceneObject::from_patch(id.to_string(), ObjectPatch::named(name))
}

/// Object with explicit geometry and material types.
pub fn object_with(
    id: &str,
    name: &str,
    geometry_type: GeometryType,
    material_type: MaterialType,
) -> SceneObject {
    SceneObject::from_patch(
        id.to_string(),
        ObjectPatch::named(name)
            .with_geometry(geometry_type)
            .with_material(material_type),
    )
}

/// Object holding `children`.
pub fn tree(id: &str, name: &str, children: Vec<SceneObject>) -> SceneObject {
    object(id, name).with_children(children)
}

/// Hidden object.
pub fn hidden(id: &str, name: &str) -> SceneObject {
    SceneObject {
        visible: false,
        ..object(id, name)
    }
}

// ── Scene factories ─────────────────────────────────────────────

pub fn scene(root: Vec<SceneObject>) -> SceneData {
    SceneData {
        root,
        last_update_timestamp: 0,
    }
}

pub fn empty_scene() -> SceneData {
    scene(Vec::new())
}

/// Two roots: `a -> b -> c` and a sphere `d`.
pub fn sample_scene() -> SceneData {
    scene(vec![
        tree("a", "A", vec![tree("b", "B", vec![object("c", "C")])]),
        object_with("d", "D", GeometryType::Sphere, MaterialType::Phong),
    ])
}

// ── Stub primitives ─────────────────────────────────────────────

/// Minimal primitive with a handle and a uid.
#[derive(Debug, Clone)]
pub struct StubPrimitive {
    pub handle: InstanceHandle,
    pub uuid: String,
}

impl StubPrimitive {
    pub fn new(handles: &mut HandleAllocator, uuid: &str) -> Self {
        Self {
            handle: handles.allocate(),
            uuid: uuid.to_string(),
        }
    }

    /// Fixed handle, for building look-alike instances.
    pub fn with_handle(raw: u64, uuid: &str) -> Self {
        Self {
            handle: InstanceHandle::from_raw(raw),
            uuid: uuid.to_string(),
        }
    }
}

impl RenderPrimitive for StubPrimitive {
    fn handle(&self) -> InstanceHandle {
        self.handle
    }

    fn uuid(&self) -> &str {
        &self.uuid
    }
}

/// Geometry stub with an optional attribute container.
#[derive(Debug, Clone)]
pub struct StubGeometry {
    pub primitive: StubPrimitive,
    pub attributes: Option<InstanceHandle>,
}

impl StubGeometry {
    pub fn new(handles: &mut HandleAllocator, uuid: &str) -> Self {
        let primitive = StubPrimitive::new(handles, uuid);
        Self {
            primitive,
            attributes: Some(handles.allocate()),
        }
    }

    pub fn without_attributes(handles: &mut HandleAllocator, uuid: &str) -> Self {
        Self {
            primitive: StubPrimitive::new(handles, uuid),
            attributes: None,
        }
    }
}

impl RenderPrimitive for StubGeometry {
    fn handle(&self) -> InstanceHandle {
        self.primitive.handle
    }

    fn uuid(&self) -> &str {
        &self.primitive.uuid
    }
}

impl GeometryPrimitive for StubGeometry {
    fn attributes(&self) -> Option<InstanceHandle> {
        self.attributes
    }
}
