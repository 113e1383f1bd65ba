//! Integration tests for scene store mutations.
//!
//! Covers structural invariants: subtree removal, count-preserving moves,
//! cycle rejection and copy-on-write updates.

use scene_lab_lib::error::SceneError;
use scene_lab_lib::fixtures::*;
use scene_lab_lib::state::SceneStore;
use shared::{GeometryType, ObjectPatch};

fn sample_store() -> SceneStore {
    let mut store = SceneStore::default();
    store.set_scene(sample_scene()).unwrap();
    store
}

#[test]
fn test_reset_scene_single_root() {
    let mut store = SceneStore::default();
    let before = store.last_update_timestamp();
    store.reset_scene();

    assert_eq!(store.root().len(), 1);
    let root = &store.root()[0];
    assert_eq!(root.name, "Root Object");
    assert_eq!(root.geometry_type, GeometryType::Box);
    assert_eq!(root.color, "#ff0000");
    assert!(root.children.is_empty());
    assert!(root.visible);
    assert_eq!(store.version(), 1);
    assert!(store.last_update_timestamp() > before);
}

#[test]
fn test_remove_drops_whole_subtree() {
    let mut store = sample_store();
    assert!(store.remove_object("a"));

    assert_eq!(store.object_count(), 1);
    for id in ["a", "b", "c"] {
        assert!(store.get_object(id).is_none(), "{id} should be gone");
    }
    assert!(store.get_object("d").is_some());
}

#[test]
fn test_remove_nested_keeps_ancestors() {
    let mut store = sample_store();
    assert!(store.remove_object("c"));
    assert_eq!(store.object_count(), 3);
    assert!(store.get_object("b").unwrap().children.is_empty());
}

#[test]
fn test_missing_ids_are_no_ops() {
    let mut store = sample_store();
    let version = store.version();
    let timestamp = store.last_update_timestamp();

    assert!(!store.remove_object("ghost"));
    assert!(!store.update_object("ghost", &ObjectPatch::named("x")));
    assert!(!store.toggle_visibility("ghost"));
    assert!(store.add_object(Some("ghost"), ObjectPatch::named("x")).is_none());
    assert!(!store.reparent_object("ghost", None).unwrap());
    assert!(!store.reparent_object("c", Some("ghost")).unwrap());

    assert_eq!(store.version(), version);
    assert_eq!(store.last_update_timestamp(), timestamp);
    assert_eq!(store.object_count(), 4);
}

#[test]
fn test_reparent_preserves_count_and_subtree() {
    let mut store = sample_store();
    assert!(store.reparent_object("b", Some("d")).unwrap());

    assert_eq!(store.object_count(), 4);
    assert_eq!(store.data().parent_of("b"), Some(Some(&"d".to_string())));
    assert_eq!(store.data().parent_of("c"), Some(Some(&"b".to_string())));
    assert!(store.get_object("a").unwrap().children.is_empty());
}

#[test]
fn test_reparent_to_root_appends() {
    let mut store = sample_store();
    assert!(store.reparent_object("c", None).unwrap());

    let ids: Vec<&str> = store.root().iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d", "c"]);
    assert_eq!(store.data().parent_of("c"), Some(None));
}

#[test]
fn test_root_to_root_is_no_op() {
    let mut store = sample_store();
    let version = store.version();
    assert!(!store.reparent_object("a", None).unwrap());
    assert_eq!(store.version(), version);
}

#[test]
fn test_reparent_under_self_rejected() {
    let mut store = sample_store();
    let before = store.data().clone();

    let err = store.reparent_object("a", Some("a")).unwrap_err();
    assert!(matches!(err, SceneError::CyclicReparent { .. }));
    assert_eq!(store.data(), &before);
}

#[test]
fn test_parent_child_cycle_scenario() {
    let mut store = SceneStore::default();
    let a = store.add_object(None, ObjectPatch::named("A")).unwrap();
    let b = store.add_object(Some(&a), ObjectPatch::named("B")).unwrap();
    let version = store.version();

    // A under its own child B
    let err = store.reparent_object(&a, Some(&b)).unwrap_err();
    match err {
        SceneError::CyclicReparent {
            object_id,
            new_parent_id,
        } => {
            assert_eq!(object_id, a);
            assert_eq!(new_parent_id, b);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.version(), version);
    assert_eq!(store.root().len(), 1);
    assert_eq!(store.root()[0].children[0].id, b);

    // The legal direction still works
    assert!(store.reparent_object(&b, None).unwrap());
    assert_eq!(store.root().len(), 2);
}

#[test]
fn test_deep_descendant_cycle_rejected() {
    let mut store = sample_store();
    assert!(store.reparent_object("a", Some("c")).is_err());
    assert_eq!(store.object_count(), 4);
    assert_eq!(store.data().parent_of("c"), Some(Some(&"b".to_string())));
}

#[test]
fn test_update_preserves_children() {
    let mut store = sample_store();
    let patch = ObjectPatch::named("Renamed")
        .with_geometry(GeometryType::Torus)
        .with_color("#123456");
    assert!(store.update_object("a", &patch));

    let a = store.get_object("a").unwrap();
    assert_eq!(a.name, "Renamed");
    assert_eq!(a.geometry_type, GeometryType::Torus);
    assert_eq!(a.color, "#123456");
    assert_eq!(a.children.len(), 1);
    assert_eq!(a.children[0].id, "b");
    assert!(store.get_object("c").is_some());
}

#[test]
fn test_update_leaves_other_branches_untouched() {
    let mut store = sample_store();
    let d_before = store.get_object("d").unwrap().clone();
    store.update_object("c", &ObjectPatch::default().with_visible(false));
    assert_eq!(store.get_object("d").unwrap(), &d_before);
    assert!(!store.get_object("c").unwrap().visible);
}

#[test]
fn test_toggle_visibility_twice_restores() {
    let mut store = sample_store();
    assert!(store.toggle_visibility("b"));
    assert!(!store.get_object("b").unwrap().visible);
    assert!(store.toggle_visibility("b"));
    assert!(store.get_object("b").unwrap().visible);
}

#[test]
fn test_every_mutation_bumps_markers() {
    let mut store = SceneStore::default();
    let mut last = (store.version(), store.last_update_timestamp());

    let id = store.add_object(None, ObjectPatch::named("A")).unwrap();
    store.update_object(&id, &ObjectPatch::named("B"));
    store.toggle_visibility(&id);
    store.add_object(Some(&id), ObjectPatch::named("C"));
    store.remove_object(&id);

    assert_eq!(store.version(), last.0 + 5);
    assert!(store.last_update_timestamp() >= last.1 + 5);
    last = (store.version(), store.last_update_timestamp());

    store.randomize_scene();
    assert_eq!(store.version(), last.0 + 1);
    assert!(store.last_update_timestamp() > last.1);
    assert!(store.object_count() >= 1);
}

#[test]
fn test_added_object_defaults() {
    let mut store = SceneStore::default();
    let id = store.add_object(None, ObjectPatch::default()).unwrap();
    let obj = store.get_object(&id).unwrap();

    assert!(obj.name.starts_with("Object_"));
    assert_eq!(obj.scale, [1.0, 1.0, 1.0]);
    assert!(obj.visible);
    assert!(obj.children.is_empty());
}

#[test]
fn test_set_scene_rejects_duplicate_ids() {
    let mut store = sample_store();
    let before = store.data().clone();
    let version = store.version();

    let dup = scene(vec![object("p", "P"), object("p", "P2"), object("c", "C")]);
    let err = store.set_scene(dup).unwrap_err();
    assert!(matches!(err, SceneError::DuplicateId(ref id) if id == "p"));
    assert_eq!(store.data(), &before);
    assert_eq!(store.version(), version);

    // Nested duplicates are caught too
    let nested = scene(vec![tree("p", "P", vec![object("p", "Inner")])]);
    assert!(store.set_scene(nested).is_err());

    // With unique ids a move keeps the count
    let unique = scene(vec![object("p", "P"), object("q", "Q"), object("c", "C")]);
    store.set_scene(unique).unwrap();
    assert!(store.reparent_object("c", Some("p")).unwrap());
    assert_eq!(store.object_count(), 3);
}
