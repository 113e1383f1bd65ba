//! Display helper functions for scene objects

use shared::{GeometryType, SceneObject};

/// Get display name for an object
pub fn object_display_name(object: &SceneObject) -> String {
    format!("{} ({})", object.name, short_id(&object.id))
}

/// Get icon for an object's geometry
pub fn object_icon(object: &SceneObject) -> &'static str {
    match object.geometry_type {
        GeometryType::Box => "[B]",
        GeometryType::Sphere => "[S]",
        GeometryType::Cylinder => "[Y]",
        GeometryType::Cone => "[K]",
        GeometryType::Torus => "[O]",
    }
}

/// Indented tree listing, one line per object
pub fn outline(objects: &[SceneObject]) -> Vec<String> {
    let mut lines = Vec::new();
    push_outline(objects, 0, &mut lines);
    lines
}

fn push_outline(objects: &[SceneObject], depth: usize, lines: &mut Vec<String>) {
    for obj in objects {
        lines.push(format!(
            "{}{} {} {}/{}{}",
            "  ".repeat(depth),
            object_icon(obj),
            object_display_name(obj),
            obj.geometry_type,
            obj.material_type,
            if obj.visible { "" } else { " (hidden)" },
        ));
        push_outline(&obj.children, depth + 1, lines);
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
