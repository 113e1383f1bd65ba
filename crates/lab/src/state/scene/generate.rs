//! Canonical and random scene generation

use std::f64::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;
use shared::{GeometryType, MaterialType, SceneObject};

use super::SceneStore;
use crate::state::settings::RandomSceneSettings;

impl SceneStore {
    /// Replace the scene with a single red box named "Root Object"
    pub fn reset_scene(&mut self) {
        let root = SceneObject {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Root Object".to_string(),
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            geometry_type: GeometryType::Box,
            material_type: MaterialType::Normal,
            color: "#ff0000".to_string(),
            children: vec![],
            visible: true,
        };
        self.commit(vec![root]);
        tracing::info!("scene reset");
    }

    /// Replace the scene with a random forest using default generation settings
    pub fn randomize_scene(&mut self) {
        self.randomize_scene_with(&mut rand::thread_rng(), &RandomSceneSettings::default());
    }

    /// Replace the scene with a random forest drawn from `rng`
    pub fn randomize_scene_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        settings: &RandomSceneSettings,
    ) {
        let count = rng.gen_range(1..=settings.max_root_objects.max(1));
        let root = (0..count).map(|_| random_object(rng, 0, settings)).collect();
        self.commit(root);
        tracing::info!(
            "scene randomized: {} root objects, {} total",
            count,
            self.object_count()
        );
    }
}

/// Random object; below `settings.max_depth` it may get children
pub fn random_object<R: Rng + ?Sized>(
    rng: &mut R,
    depth: usize,
    settings: &RandomSceneSettings,
) -> SceneObject {
    let geometry_type = *GeometryType::all()
        .choose(rng)
        .unwrap_or(&GeometryType::Box);
    let material_type = *MaterialType::all()
        .choose(rng)
        .unwrap_or(&MaterialType::Normal);

    let branch = settings.branch_probability.clamp(0.0, 1.0);
    let children = if depth < settings.max_depth && rng.gen_bool(branch) {
        let count = rng.gen_range(0..=settings.max_children);
        (0..count)
            .map(|_| random_object(rng, depth + 1, settings))
            .collect()
    } else {
        vec![]
    };

    SceneObject {
        id: uuid::Uuid::new_v4().to_string(),
        name: format!("Object_{}", rng.gen_range(0..1000)),
        position: [
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ],
        rotation: [
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
        ],
        scale: [
            rng.gen_range(0.5..1.0),
            rng.gen_range(0.5..1.0),
            rng.gen_range(0.5..1.0),
        ],
        geometry_type,
        material_type,
        color: random_color(rng),
        children,
        visible: true,
    }
}

/// Random `#rrggbb` color
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06x}", rng.gen_range(0..=0xff_ffffu32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reset_scene() {
        let mut store = SceneStore::default();
        store.randomize_scene();
        store.reset_scene();

        assert_eq!(store.root().len(), 1);
        let root = &store.root()[0];
        assert_eq!(root.name, "Root Object");
        assert_eq!(root.geometry_type, GeometryType::Box);
        assert_eq!(root.material_type, MaterialType::Normal);
        assert_eq!(root.color, "#ff0000");
        assert!(root.visible);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_randomize_bounds() {
        let settings = RandomSceneSettings::default();
        let mut store = SceneStore::default();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            store.randomize_scene_with(&mut rng, &settings);

            assert!((1..=3).contains(&store.root().len()));
            for obj in store.data().iter() {
                assert!(obj.children.len() <= 2, "too many children");
                assert!(obj.visible);
            }
            for root in store.root() {
                assert!(root.depth() <= 3, "depth {} exceeds bound", root.depth());
            }
        }
    }

    #[test]
    fn test_randomize_is_seeded() {
        let settings = RandomSceneSettings::default();
        let mut a = SceneStore::default();
        let mut b = SceneStore::default();
        a.randomize_scene_with(&mut StdRng::seed_from_u64(7), &settings);
        b.randomize_scene_with(&mut StdRng::seed_from_u64(7), &settings);

        let names = |s: &SceneStore| s.data().iter().map(|o| o.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn test_random_color_format() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let color = random_color(&mut rng);
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(u32::from_str_radix(&color[1..], 16).is_ok());
        }
    }
}
