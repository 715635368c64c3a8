use glam::{Quat, Vec3};

use crate::{
    camera::PerspectiveCamera,
    demo::{DemoScene, FrameInput, SceneContext},
    scene_graph::{Geometry, Material, Object3D, ObjectId},
};

/// A spinning, bobbing cube watched by a camera that circles around it.
pub struct Animations {
    cube: ObjectId,
    time: f32,
    speed: f32,
    radius: f32,
    paused: bool,
}

pub fn setup(context: &mut SceneContext) -> anyhow::Result<Box<dyn DemoScene>> {
    let scene = &mut context.scene;

    let geometry = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
    let material = scene.add_material(Material::basic(0xff0000));
    let cube = scene.add(Object3D::mesh("Cube", geometry, material));

    context.camera = PerspectiveCamera::new(75.0, 4.0 / 3.0).with_position(Vec3::Z * 3.0);

    let mut animations = Animations {
        cube,
        time: 0.0,
        speed: 1.0,
        radius: 3.0,
        paused: false,
    };
    animations.apply(context);

    Ok(Box::new(animations))
}

impl Animations {
    fn apply(&mut self, context: &mut SceneContext) {
        let t = self.time;
        let cube_position = Vec3::new(0.0, (t * 2.0).sin() * 0.25, 0.0);

        context.scene.set_object_translation(self.cube, cube_position);
        context
            .scene
            .set_object_rotation(self.cube, Quat::from_rotation_y(t));

        context.camera.position = Vec3::new(t.sin() * self.radius, 1.0, t.cos() * self.radius);
        context.camera.look_at(cube_position);
    }
}

impl DemoScene for Animations {
    fn update(&mut self, context: &mut SceneContext, frame: &FrameInput) {
        if !self.paused {
            self.time += frame.delta * self.speed;
        }

        self.apply(context);
    }

    fn debug_ui(&mut self, _context: &mut SceneContext, ui: &imgui::Ui) {
        ui.slider("Speed", 0.0, 5.0, &mut self.speed);
        ui.slider("Camera radius", 1.5, 10.0, &mut self.radius);
        ui.checkbox("Paused", &mut self.paused);
        ui.text(format!("Time: {:.2}", self.time));
    }
}
