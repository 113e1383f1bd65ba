//! Render primitive identity as seen by the tracker

use serde::{Deserialize, Serialize};

/// Opaque identity of a render primitive.
///
/// Two primitives are the same instance iff their handles are equal; looking
/// alike field-by-field means nothing. Handles are allocated by the rendering
/// layer and never reused within one renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceHandle(u64);

impl InstanceHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Anything the tracker can register: a handle plus a uid carried on the instance
pub trait RenderPrimitive {
    fn handle(&self) -> InstanceHandle;
    fn uuid(&self) -> &str;
}

/// Geometry primitive, optionally exposing its attribute container
pub trait GeometryPrimitive: RenderPrimitive {
    fn attributes(&self) -> Option<InstanceHandle>;
}

/// Sequential handle source
#[derive(Debug, Default)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub fn allocate(&mut self) -> InstanceHandle {
        self.next += 1;
        InstanceHandle(self.next)
    }
}
