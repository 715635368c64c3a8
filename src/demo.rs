use std::time::Instant;

use anyhow::Context;

use crate::{
    camera::PerspectiveCamera,
    controls::OrbitControls,
    input::Cursor,
    scene_graph::Scene,
    scenes::{self, SceneEntry},
};

/// Per-frame input handed to the active scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Seconds since the scene was set up
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub delta: f32,
    pub cursor: Cursor,
}

/// Everything a scene script builds and mutates.
pub struct SceneContext {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: Option<OrbitControls>,
}

impl SceneContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            camera: PerspectiveCamera::default(),
            controls: None,
        }
    }

    /// Enables orbit controls around `target`, starting from the current camera.
    pub fn orbit_around(&mut self, target: glam::Vec3) -> &mut OrbitControls {
        self.camera.look_at(target);
        self.controls.insert(OrbitControls::new(target))
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new()
    }
}

pub trait DemoScene {
    fn update(&mut self, _context: &mut SceneContext, _frame: &FrameInput) {}

    fn debug_ui(&mut self, _context: &mut SceneContext, _ui: &imgui::Ui) {}
}

pub struct DemoState {
    pub entry: &'static SceneEntry,
    pub context: SceneContext,
    pub start_time: Instant,
    pub show_debug_panel: bool,
    demo: Box<dyn DemoScene>,
    last_update: Instant,
    generation: u64,
}

impl DemoState {
    pub fn new(entry: &'static SceneEntry) -> anyhow::Result<Self> {
        let (context, demo) = Self::setup(entry)?;
        let now = Instant::now();

        Ok(Self {
            entry,
            context,
            start_time: now,
            show_debug_panel: true,
            demo,
            last_update: now,
            generation: 0,
        })
    }

    fn setup(entry: &'static SceneEntry) -> anyhow::Result<(SceneContext, Box<dyn DemoScene>)> {
        let mut context = SceneContext::new();
        let demo = (entry.setup)(&mut context)
            .with_context(|| format!("Failed to set up scene {}", entry.name))?;

        // Scenes that never move anything still need world matrices
        context.scene.late_update();

        Ok((context, demo))
    }

    /// Replaces the current scene with a freshly built one.
    pub fn switch_to(&mut self, entry: &'static SceneEntry) -> anyhow::Result<()> {
        let aspect = self.context.camera.aspect;
        let (mut context, demo) = Self::setup(entry)?;
        context.camera.set_aspect(aspect);

        log::info!("Switched to scene {} ({})", entry.title, entry.name);

        self.entry = entry;
        self.context = context;
        self.demo = demo;
        self.start_time = Instant::now();
        self.last_update = self.start_time;
        self.generation += 1;

        Ok(())
    }

    pub fn switch_to_index(&mut self, index: usize) -> anyhow::Result<()> {
        match scenes::SCENES.get(index) {
            Some(entry) => self.switch_to(entry),
            None => Ok(()),
        }
    }

    pub fn switch_to_next(&mut self) -> anyhow::Result<()> {
        self.switch_to_index((self.scene_index() + 1) % scenes::SCENES.len())
    }

    pub fn scene_index(&self) -> usize {
        scenes::index_of(self.entry.name).unwrap_or(0)
    }

    /// Bumped on every scene switch, so GPU caches keyed by scene ids can be dropped.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frame_input(&mut self, cursor: Cursor) -> FrameInput {
        let now = Instant::now();
        let delta = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        FrameInput {
            elapsed: now.duration_since(self.start_time).as_secs_f32(),
            delta,
            cursor,
        }
    }

    pub fn update(&mut self, frame: &FrameInput) {
        self.demo.update(&mut self.context, frame);

        if let Some(controls) = self.context.controls.as_mut() {
            controls.update(&mut self.context.camera);
        }

        self.context.scene.late_update();
    }

    pub fn debug_ui(&mut self, ui: &imgui::Ui) {
        self.demo.debug_ui(&mut self.context, ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_moves_camera_and_propagates_scene_changes() {
        let mut state = DemoState::new(scenes::find("lights").unwrap()).unwrap();
        let sun = state
            .context
            .scene
            .get_object_by_name("Directional light")
            .unwrap();
        let camera_before = state.context.camera.position;

        state
            .context
            .controls
            .as_mut()
            .unwrap()
            .rotate(300.0, 0.0, 600.0);
        state.update(&FrameInput {
            delta: 0.5,
            ..Default::default()
        });

        assert!(!state.context.camera.position.abs_diff_eq(camera_before, 1e-3));

        // The sun starts at angle 0.6 and turns 0.3 rad/s, so world transforms
        // must already reflect this frame's move.
        let angle = 0.6_f32 + 0.5 * 0.3;
        let expected = glam::Vec3::new(angle.cos() * 4.0, 3.0, angle.sin() * 4.0);
        assert!(state
            .context
            .scene
            .world_position(sun)
            .abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn switching_rebuilds_scene() {
        let mut state = DemoState::new(&scenes::SCENES[0]).unwrap();
        state.context.camera.set_aspect(2.0);

        state.switch_to_next().unwrap();

        assert_eq!(state.scene_index(), 1);
        assert_eq!(state.generation(), 1);
        assert_eq!(state.context.camera.aspect, 2.0);
        assert!(state.context.scene.objects.len() > 0);
        assert_ne!(state.entry.name, scenes::SCENES[0].name);
    }

    #[test]
    fn next_wraps_around() {
        let last = scenes::SCENES.len() - 1;
        let mut state = DemoState::new(&scenes::SCENES[last]).unwrap();
        state.switch_to_next().unwrap();
        assert_eq!(state.scene_index(), 0);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut state = DemoState::new(&scenes::SCENES[0]).unwrap();
        state.switch_to_index(99).unwrap();
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn frame_input_measures_time() {
        let mut state = DemoState::new(&scenes::SCENES[0]).unwrap();
        let frame = state.frame_input(Cursor { x: 0.1, y: -0.2 });
        assert!(frame.elapsed >= 0.0);
        assert!(frame.delta >= 0.0);
        assert_eq!(frame.cursor, Cursor { x: 0.1, y: -0.2 });
    }
}
