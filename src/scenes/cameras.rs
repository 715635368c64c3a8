use std::f32::consts::TAU;

use glam::Vec3;

use crate::{
    camera::PerspectiveCamera,
    demo::{DemoScene, FrameInput, SceneContext},
    input::Cursor,
    scene_graph::{helpers::axes_helper, Geometry, Material, Object3D, ObjectKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CameraMode {
    FollowCursor,
    Orbit,
}

const MODES: [&str; 2] = ["Follow cursor", "Orbit controls"];

/// A single cube, viewed either by a camera driven by the cursor position or
/// by damped orbit controls.
pub struct Cameras {
    mode: CameraMode,
    damping: bool,
}

pub fn setup(context: &mut SceneContext) -> anyhow::Result<Box<dyn DemoScene>> {
    let scene = &mut context.scene;

    let geometry = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
    let material = scene.add_material(Material::basic(0xff0000));
    scene.add(Object3D::mesh("Cube", geometry, material));

    let axes = scene.add_line_set(axes_helper(2.0));
    scene.add(Object3D::new("Axes helper", ObjectKind::Lines(axes)));

    context.camera = PerspectiveCamera::new(75.0, 4.0 / 3.0).with_position(Vec3::Z * 3.0);
    context.camera.look_at(Vec3::ZERO);

    Ok(Box::new(Cameras {
        mode: CameraMode::FollowCursor,
        damping: true,
    }))
}

/// Camera position for a cursor: a full turn around the cube across the
/// canvas width, and up/down with the vertical position.
fn cursor_camera_position(cursor: Cursor) -> Vec3 {
    Vec3::new(
        (cursor.x * TAU).sin() * 3.0,
        cursor.y * 5.0,
        (cursor.x * TAU).cos() * 3.0,
    )
}

impl Cameras {
    fn set_mode(&mut self, context: &mut SceneContext, mode: CameraMode) {
        // Re-selecting the current mode keeps the existing controls
        if mode == self.mode {
            return;
        }
        self.mode = mode;

        match mode {
            CameraMode::FollowCursor => context.controls = None,
            CameraMode::Orbit => {
                let damping = self.damping;
                let controls = context.orbit_around(Vec3::ZERO);
                controls.enable_damping = damping;
            }
        }
    }
}

impl DemoScene for Cameras {
    fn update(&mut self, context: &mut SceneContext, frame: &FrameInput) {
        if self.mode == CameraMode::FollowCursor {
            context.camera.position = cursor_camera_position(frame.cursor);
            context.camera.look_at(Vec3::ZERO);
        }
    }

    fn debug_ui(&mut self, context: &mut SceneContext, ui: &imgui::Ui) {
        let mut index = self.mode as usize;
        if ui.combo_simple_string("Camera", &mut index, &MODES) {
            let mode = if index == 0 {
                CameraMode::FollowCursor
            } else {
                CameraMode::Orbit
            };
            self.set_mode(context, mode);
        }

        if self.mode == CameraMode::Orbit && ui.checkbox("Damping", &mut self.damping) {
            if let Some(controls) = context.controls.as_mut() {
                controls.enable_damping = self.damping;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_cursor_looks_from_front() {
        let position = cursor_camera_position(Cursor::default());
        assert!(position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-6));
    }

    #[test]
    fn quarter_cursor_moves_to_the_side() {
        let position = cursor_camera_position(Cursor { x: 0.25, y: 0.2 });
        assert!(position.abs_diff_eq(Vec3::new(3.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn follow_mode_tracks_cursor() {
        let mut context = SceneContext::new();
        let mut demo = Cameras {
            mode: CameraMode::FollowCursor,
            damping: true,
        };

        let frame = FrameInput {
            cursor: Cursor { x: -0.25, y: 0.0 },
            ..Default::default()
        };
        demo.update(&mut context, &frame);

        assert!(context
            .camera
            .position
            .abs_diff_eq(Vec3::new(-3.0, 0.0, 0.0), 1e-5));
        assert!(context.camera.forward().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn orbit_mode_installs_controls() {
        let mut context = SceneContext::new();
        context.camera.position = Vec3::Z * 3.0;
        let mut demo = Cameras {
            mode: CameraMode::FollowCursor,
            damping: false,
        };

        demo.set_mode(&mut context, CameraMode::Orbit);
        let controls = context.controls.as_ref().unwrap();
        assert!(!controls.enable_damping);

        // Cursor no longer moves the camera
        let frame = FrameInput {
            cursor: Cursor { x: 0.25, y: 0.0 },
            ..Default::default()
        };
        demo.update(&mut context, &frame);
        assert_eq!(context.camera.position, Vec3::Z * 3.0);

        demo.set_mode(&mut context, CameraMode::FollowCursor);
        assert!(context.controls.is_none());
    }

    #[test]
    fn reselecting_orbit_keeps_controls() {
        let mut context = SceneContext::new();
        context.camera.position = Vec3::Z * 3.0;
        let mut demo = Cameras {
            mode: CameraMode::FollowCursor,
            damping: true,
        };

        demo.set_mode(&mut context, CameraMode::Orbit);
        context.controls.as_mut().unwrap().damping_factor = 0.2;

        demo.set_mode(&mut context, CameraMode::Orbit);
        assert_eq!(context.controls.as_ref().unwrap().damping_factor, 0.2);
    }
}
