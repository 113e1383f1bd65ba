//! Render primitives produced by the scene renderer

use shared::{GeometryType, MaterialType};

use super::geometry::{GeometryBuffers, GeometryParams};
use crate::tracking::{GeometryPrimitive, HandleAllocator, InstanceHandle, RenderPrimitive};

fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Object-level node (the group holding a mesh and its children)
#[derive(Debug, Clone)]
pub struct ObjectInstance {
    handle: InstanceHandle,
    uuid: String,
    pub render_id: String,
}

impl ObjectInstance {
    pub(crate) fn new(handles: &mut HandleAllocator, render_id: String) -> Self {
        Self {
            handle: handles.allocate(),
            uuid: new_uuid(),
            render_id,
        }
    }

    pub fn object_type(&self) -> &'static str {
        "Group"
    }
}

impl RenderPrimitive for ObjectInstance {
    fn handle(&self) -> InstanceHandle {
        self.handle
    }

    fn uuid(&self) -> &str {
        &self.uuid
    }
}

/// Attribute container owned by a geometry
#[derive(Debug, Clone)]
pub struct AttributeSet {
    pub handle: InstanceHandle,
    pub buffers: GeometryBuffers,
}

/// Geometry with generated vertex buffers
#[derive(Debug, Clone)]
pub struct GeometryInstance {
    handle: InstanceHandle,
    uuid: String,
    pub geometry_type: GeometryType,
    pub params: GeometryParams,
    pub attributes: AttributeSet,
}

impl GeometryInstance {
    pub(crate) fn build(handles: &mut HandleAllocator, geometry_type: GeometryType) -> Self {
        let params = GeometryParams::for_scene(geometry_type);
        Self {
            handle: handles.allocate(),
            uuid: new_uuid(),
            geometry_type,
            params,
            attributes: AttributeSet {
                handle: handles.allocate(),
                buffers: params.build(),
            },
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.attributes.buffers.vertex_count()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.buffers.attribute_names().len()
    }
}

impl RenderPrimitive for GeometryInstance {
    fn handle(&self) -> InstanceHandle {
        self.handle
    }

    fn uuid(&self) -> &str {
        &self.uuid
    }
}

impl GeometryPrimitive for GeometryInstance {
    fn attributes(&self) -> Option<InstanceHandle> {
        Some(self.attributes.handle)
    }
}

/// Material; color is a property updated in place
#[derive(Debug, Clone)]
pub struct MaterialInstance {
    handle: InstanceHandle,
    uuid: String,
    pub material_type: MaterialType,
    pub color: String,
}

impl MaterialInstance {
    pub(crate) fn new(
        handles: &mut HandleAllocator,
        material_type: MaterialType,
        color: &str,
    ) -> Self {
        Self {
            handle: handles.allocate(),
            uuid: new_uuid(),
            material_type,
            color: color.to_string(),
        }
    }

    /// Engine-side class name
    pub fn class_name(&self) -> &'static str {
        match self.material_type {
            MaterialType::Normal => "MeshNormalMaterial",
            MaterialType::Phong => "MeshPhongMaterial",
            MaterialType::Standard => "MeshStandardMaterial",
            MaterialType::Basic => "MeshBasicMaterial",
        }
    }
}

impl RenderPrimitive for MaterialInstance {
    fn handle(&self) -> InstanceHandle {
        self.handle
    }

    fn uuid(&self) -> &str {
        &self.uuid
    }
}
