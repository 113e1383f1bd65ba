//! Integration tests for the LabCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use scene_lab_lib::command::{execute_json, execute_json_batch};
use scene_lab_lib::harness::LabHarness;

#[test]
fn test_command_reset_and_render() {
    let mut h = LabHarness::new();

    let resp = execute_json(&mut h, r#"{"command": "reset_scene"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.object_count(), 1);

    let resp = execute_json(&mut h, r#"{"command": "render"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["pass"], 1);
    assert_eq!(data["objects_created"], 1);
}

#[test]
fn test_command_randomize_with_seed() {
    let mut a = LabHarness::new();
    let mut b = LabHarness::new();
    let json = r#"{"command": "randomize_scene", "seed": 7}"#;

    let ra = execute_json(&mut a, json).unwrap();
    let rb = execute_json(&mut b, json).unwrap();
    assert!(ra.success);
    assert_eq!(ra.data.unwrap()["object_count"], rb.data.unwrap()["object_count"]);
}

#[test]
fn test_command_add_update_toggle() {
    let mut h = LabHarness::new();

    let json = r##"{"command": "add_object", "patch": {"name": "Ring", "geometry_type": "torus", "color": "#abcdef"}}"##;
    let resp = execute_json(&mut h, json).unwrap();
    let id = resp.data.unwrap()["id"].as_str().unwrap().to_string();

    let obj = h.scene.get_object(&id).unwrap();
    assert_eq!(obj.name, "Ring");
    assert_eq!(obj.color, "#abcdef");

    let json = format!(
        r#"{{"command": "update_object", "id": "{id}", "patch": {{"material_type": "phong"}}}}"#
    );
    let resp = execute_json(&mut h, &json).unwrap();
    assert_eq!(resp.data.unwrap()["updated"], true);
    assert_eq!(
        h.scene.get_object(&id).unwrap().material_type,
        shared::MaterialType::Phong
    );

    let json = format!(r#"{{"command": "toggle_visibility", "id": "{id}"}}"#);
    let data = execute_json(&mut h, &json).unwrap().data.unwrap();
    assert_eq!(data["toggled"], true);
    assert_eq!(data["visible"], false);
}

#[test]
fn test_command_remove_missing_is_not_an_error() {
    let mut h = LabHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "remove_object", "id": "ghost"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["removed"], false);
}

#[test]
fn test_command_report_after_reparent() {
    let mut h = LabHarness::new();
    let parent = h.add_object(None, "Parent").unwrap();
    let child = h.add_object(None, "Child").unwrap();
    h.render();

    let json = format!(
        r#"[
            {{"command": "reparent_object", "id": "{child}", "new_parent_id": "{parent}"}},
            {{"command": "render"}},
            {{"command": "report"}}
        ]"#
    );
    let responses = execute_json_batch(&mut h, &json).unwrap();
    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|r| r.success));
    assert_eq!(responses[0].data.as_ref().unwrap()["moved"], true);

    let report = responses[2].data.as_ref().unwrap();
    assert_eq!(report["initialized"], true);
    let entries = report["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["object_changed"], false);
    assert_eq!(entries[1]["id"], child.as_str());
    assert_eq!(entries[1]["object_changed"], true);
}

#[test]
fn test_command_reset_tracker_clears_flags() {
    let mut h = LabHarness::new();
    let a = h.add_object(None, "A").unwrap();
    let b = h.add_object(None, "B").unwrap();
    h.render();
    h.reparent(&b, Some(&a)).unwrap();
    h.render();
    assert!(h.tracker.has_object_changed(&b));

    let json = r#"[{"command": "reset_tracker"}, {"command": "report"}]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(h.reset_signal.generation(), 1);
    let report = responses[1].data.as_ref().unwrap();
    assert!(report["entries"]
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["object_changed"] == false));
}

#[test]
fn test_command_inspect_and_export() {
    let mut h = LabHarness::new();
    let json = r#"[
        {"command": "reset_scene"},
        {"command": "add_object", "patch": {"name": "Extra"}},
        {"command": "inspect"},
        {"command": "export_scene"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();

    let inspect = responses[2].data.as_ref().unwrap();
    assert_eq!(inspect["object_count"], 2);
    assert_eq!(inspect["root_count"], 2);

    let scene_json = responses[3].data.as_ref().unwrap()["scene_json"]
        .as_str()
        .unwrap();
    let mut h2 = LabHarness::new();
    h2.load_scene_json(scene_json).unwrap();
    assert_eq!(h2.object_count(), 2);
    assert!(h2.find_by_name("Extra").is_some());
}

#[test]
fn test_command_batch_invalid() {
    let mut h = LabHarness::new();
    assert!(execute_json_batch(&mut h, r#"{"command": "render"}"#).is_err());
    assert!(execute_json_batch(&mut h, "[{\"command\": \"explode\"}]").is_err());
}
