//! Render primitive identity tracking
//!
//! The rendering layer registers the primitive backing each scene object on
//! every pass; the tracker remembers the last handle and uid per key and flags
//! an object once either of them differs from the previous registration. Flags
//! stay set until `clear_tracked_objects`.

mod lane;
mod primitive;

pub use lane::UuidInfo;
pub use primitive::{GeometryPrimitive, HandleAllocator, InstanceHandle, RenderPrimitive};

use shared::{GeometryType, MaterialType, ObjectId};

use lane::InstanceLane;

/// Compound key for per-type lanes
fn typed_key(id: &str, kind: &str) -> String {
    format!("{id}-{kind}")
}

/// Identity tracker for objects, geometries, materials and attribute containers
#[derive(Debug, Default)]
pub struct IdentityTracker {
    objects: InstanceLane,
    geometries: InstanceLane,
    materials: InstanceLane,
    attributes: InstanceLane,
    /// Latched on the first object registration
    initialized: bool,
}

impl IdentityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the object-level primitive for `id`
    pub fn register_object<P: RenderPrimitive + ?Sized>(&mut self, id: &str, instance: &P) {
        if self
            .objects
            .register(id, id, instance.handle(), Some(instance.uuid()))
        {
            tracing::debug!("object {id} instance changed");
        }
        self.initialized = true;
    }

    /// Register the geometry for `id`; its attribute container is tracked too
    pub fn register_geometry<G: GeometryPrimitive + ?Sized>(
        &mut self,
        id: &str,
        geometry_type: GeometryType,
        instance: &G,
    ) {
        let key = typed_key(id, geometry_type.as_str());
        if self
            .geometries
            .register(&key, id, instance.handle(), Some(instance.uuid()))
        {
            tracing::debug!("geometry {key} instance changed");
        }

        if let Some(attributes) = instance.attributes() {
            self.register_attributes_object(id, geometry_type, attributes);
        }
    }

    /// Register the attribute container of a geometry (handle comparison only)
    pub fn register_attributes_object(
        &mut self,
        id: &str,
        geometry_type: GeometryType,
        attributes: InstanceHandle,
    ) {
        let key = typed_key(id, geometry_type.as_str());
        if self.attributes.register(&key, id, attributes, None) {
            tracing::debug!("attributes {key} container changed");
        }
    }

    /// Register the material for `id`
    pub fn register_material<P: RenderPrimitive + ?Sized>(
        &mut self,
        id: &str,
        material_type: MaterialType,
        instance: &P,
    ) {
        let key = typed_key(id, material_type.as_str());
        if self
            .materials
            .register(&key, id, instance.handle(), Some(instance.uuid()))
        {
            tracing::debug!("material {key} instance changed");
        }
    }

    /// Whether `instance` is the one currently registered for `id`.
    /// False for ids that were never registered.
    pub fn is_object_instance_same<P: RenderPrimitive + ?Sized>(
        &self,
        id: &str,
        instance: &P,
    ) -> bool {
        self.objects.current(id) == Some(instance.handle())
    }

    /// Currently registered object handle
    pub fn object_instance(&self, id: &str) -> Option<InstanceHandle> {
        self.objects.current(id)
    }

    /// Object handle replaced by the last detected change
    pub fn previous_object_instance(&self, id: &str) -> Option<InstanceHandle> {
        self.objects.previous(id)
    }

    pub fn object_uuid_info(&self, id: &str) -> UuidInfo {
        self.objects.uuid_info(id, id)
    }

    pub fn geometry_uuid_info(&self, id: &str, geometry_type: GeometryType) -> UuidInfo {
        self.geometries
            .uuid_info(&typed_key(id, geometry_type.as_str()), id)
    }

    pub fn material_uuid_info(&self, id: &str, material_type: MaterialType) -> UuidInfo {
        self.materials
            .uuid_info(&typed_key(id, material_type.as_str()), id)
    }

    pub fn has_object_changed(&self, id: &str) -> bool {
        self.initialized && self.objects.is_changed(id)
    }

    pub fn has_geometry_changed(&self, id: &str) -> bool {
        self.initialized && self.geometries.is_changed(id)
    }

    pub fn has_material_changed(&self, id: &str) -> bool {
        self.initialized && self.materials.is_changed(id)
    }

    pub fn has_attributes_changed(&self, id: &str) -> bool {
        self.initialized && self.attributes.is_changed(id)
    }

    /// IDs with a registered object instance, sorted
    pub fn tracked_object_ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.objects.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop all change flags and previous values, keeping the current
    /// instances as the new baseline
    pub fn clear_tracked_objects(&mut self) {
        self.objects.clear_changes();
        self.geometries.clear_changes();
        self.materials.clear_changes();
        self.attributes.clear_changes();
        self.initialized = true;
        tracing::info!("identity tracking reset");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Prim(u64, &'static str);

    impl RenderPrimitive for Prim {
        fn handle(&self) -> InstanceHandle {
            InstanceHandle::from_raw(self.0)
        }
        fn uuid(&self) -> &str {
            self.1
        }
    }

    struct Geo(u64, &'static str, Option<u64>);

    impl RenderPrimitive for Geo {
        fn handle(&self) -> InstanceHandle {
            InstanceHandle::from_raw(self.0)
        }
        fn uuid(&self) -> &str {
            self.1
        }
    }

    impl GeometryPrimitive for Geo {
        fn attributes(&self) -> Option<InstanceHandle> {
            self.2.map(InstanceHandle::from_raw)
        }
    }

    #[test]
    fn test_same_instance_twice_never_flags() {
        let mut tracker = IdentityTracker::new();
        let r1 = Prim(1, "u1");
        tracker.register_object("o1", &r1);
        tracker.register_object("o1", &r1);

        assert!(!tracker.has_object_changed("o1"));
        assert!(tracker.is_object_instance_same("o1", &r1));
        assert!(tracker.object_uuid_info("o1").previous.is_none());
    }

    #[test]
    fn test_reference_change_with_same_uuid_flags() {
        let mut tracker = IdentityTracker::new();
        tracker.register_object("o1", &Prim(1, "u1"));
        tracker.register_object("o1", &Prim(2, "u1"));

        assert!(tracker.has_object_changed("o1"));
        assert_eq!(
            tracker.previous_object_instance("o1"),
            Some(InstanceHandle::from_raw(1))
        );
        let info = tracker.object_uuid_info("o1");
        assert!(info.changed);
        assert_eq!(info.current, "u1");
        assert_eq!(info.previous, None);
    }

    #[test]
    fn test_uuid_change_with_same_reference_flags() {
        let mut tracker = IdentityTracker::new();
        tracker.register_object("o1", &Prim(1, "u1"));
        tracker.register_object("o1", &Prim(1, "u2"));

        let info = tracker.object_uuid_info("o1");
        assert!(info.changed);
        assert_eq!(info.previous.as_deref(), Some("u1"));
    }

    #[test]
    fn test_not_initialized_suppresses_changes() {
        let mut tracker = IdentityTracker::new();
        tracker.register_geometry("o1", GeometryType::Box, &Geo(1, "g1", None));
        tracker.register_geometry("o1", GeometryType::Box, &Geo(2, "g2", None));

        assert!(!tracker.is_initialized());
        assert!(!tracker.has_geometry_changed("o1"));
        // the raw flag is still recorded
        assert!(tracker.geometry_uuid_info("o1", GeometryType::Box).changed);

        tracker.register_object("o1", &Prim(10, "u1"));
        assert!(tracker.has_geometry_changed("o1"));
    }

    #[test]
    fn test_geometry_registers_attributes() {
        let mut tracker = IdentityTracker::new();
        tracker.register_object("o1", &Prim(1, "u1"));
        tracker.register_geometry("o1", GeometryType::Sphere, &Geo(5, "g1", Some(50)));
        tracker.register_geometry("o1", GeometryType::Sphere, &Geo(5, "g1", Some(51)));

        assert!(!tracker.has_geometry_changed("o1"));
        assert!(tracker.has_attributes_changed("o1"));
    }

    #[test]
    fn test_typed_keys_are_independent() {
        let mut tracker = IdentityTracker::new();
        tracker.register_object("o1", &Prim(1, "u1"));
        tracker.register_material("o1", MaterialType::Normal, &Prim(2, "m1"));
        tracker.register_material("o1", MaterialType::Phong, &Prim(3, "m2"));

        assert!(!tracker.has_material_changed("o1"));
        assert_eq!(tracker.material_uuid_info("o1", MaterialType::Phong).current, "m2");
        assert_eq!(tracker.material_uuid_info("o1", MaterialType::Basic).current, "");
    }

    #[test]
    fn test_unknown_ids_are_neutral() {
        let tracker = IdentityTracker::new();
        let info = tracker.object_uuid_info("nope");
        assert_eq!(info, UuidInfo::default());
        assert!(!tracker.is_object_instance_same("nope", &Prim(1, "u")));
        assert!(tracker.object_instance("nope").is_none());
        assert!(tracker.tracked_object_ids().is_empty());
    }

    #[test]
    fn test_clear_preserves_baseline() {
        let mut tracker = IdentityTracker::new();
        tracker.register_object("a", &Prim(1, "u1"));
        tracker.register_object("b", &Prim(2, "u2"));
        tracker.register_object("a", &Prim(3, "u3"));
        tracker.register_material("b", MaterialType::Basic, &Prim(4, "m1"));
        tracker.register_material("b", MaterialType::Basic, &Prim(5, "m2"));
        assert!(tracker.has_object_changed("a"));
        assert!(tracker.has_material_changed("b"));

        tracker.clear_tracked_objects();

        assert!(!tracker.has_object_changed("a"));
        assert!(!tracker.has_material_changed("b"));
        assert_eq!(tracker.tracked_object_ids(), vec!["a", "b"]);
        assert_eq!(tracker.object_uuid_info("a").current, "u3");

        // the kept instance is the baseline: re-registering it is not a change
        tracker.register_object("a", &Prim(3, "u3"));
        assert!(!tracker.has_object_changed("a"));
    }
}
