//! The demo scenes. Each one is a self-contained script: it builds its own
//! scene graph and camera, and may animate them every frame and expose a few
//! parameters in the debug panel.

mod animations;
mod cameras;
mod lights;
mod textures;
mod transform_objects;

use crate::demo::{DemoScene, SceneContext};

pub type SetupFn = fn(&mut SceneContext) -> anyhow::Result<Box<dyn DemoScene>>;

#[derive(Debug)]
pub struct SceneEntry {
    pub name: &'static str,
    pub title: &'static str,
    pub setup: SetupFn,
}

pub static SCENES: &[SceneEntry] = &[
    SceneEntry {
        name: "transform-objects",
        title: "Transform objects",
        setup: transform_objects::setup,
    },
    SceneEntry {
        name: "animations",
        title: "Animations",
        setup: animations::setup,
    },
    SceneEntry {
        name: "cameras",
        title: "Cameras",
        setup: cameras::setup,
    },
    SceneEntry {
        name: "textures",
        title: "Textures",
        setup: textures::setup,
    },
    SceneEntry {
        name: "lights",
        title: "Lights",
        setup: lights::setup,
    },
];

pub fn find(name: &str) -> Option<&'static SceneEntry> {
    SCENES.iter().find(|entry| entry.name == name)
}

pub fn index_of(name: &str) -> Option<usize> {
    SCENES.iter().position(|entry| entry.name == name)
}

pub fn names() -> Vec<&'static str> {
    SCENES.iter().map(|entry| entry.name).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{demo::FrameInput, input::Cursor};

    #[test]
    fn names_are_unique() {
        let names = names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn lookup() {
        assert_eq!(find("lights").map(|entry| entry.title), Some("Lights"));
        assert_eq!(index_of("transform-objects"), Some(0));
        assert!(find("nope").is_none());
    }

    #[test]
    fn every_scene_builds_and_runs() {
        for entry in SCENES {
            let mut context = SceneContext::new();
            let mut demo = (entry.setup)(&mut context).unwrap();

            for frame in 0..10 {
                let frame = FrameInput {
                    elapsed: frame as f32 / 60.0,
                    delta: 1.0 / 60.0,
                    cursor: Cursor { x: 0.2, y: -0.1 },
                };
                demo.update(&mut context, &frame);
                if let Some(controls) = context.controls.as_mut() {
                    controls.update(&mut context.camera);
                }
                context.scene.late_update();
            }

            assert!(
                context.scene.objects.len() > 0,
                "{} has no objects",
                entry.name
            );
            assert!(
                context.camera.view_projection().is_finite(),
                "{} has a broken camera",
                entry.name
            );
        }
    }
}
