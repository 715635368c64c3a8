use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use imgui::TreeNodeFlags;

use crate::{
    camera::PerspectiveCamera,
    color::Color,
    demo::{DemoScene, FrameInput, SceneContext},
    scene_graph::{
        helpers::grid_helper,
        light::{AmbientLight, DirectionalLight},
        Geometry, Material, Object3D, ObjectId, ObjectKind,
    },
};

const SUN_HEIGHT: f32 = 3.0;
const SUN_RADIUS: f32 = 4.0;

/// Lambert-shaded objects lit by an ambient light and a directional light that
/// circles the scene.
pub struct Lights {
    ambient: ObjectId,
    sun: ObjectId,
    ambient_light: AmbientLight,
    sun_light: DirectionalLight,
    sun_speed: f32,
    sun_angle: f32,
}

pub fn setup(context: &mut SceneContext) -> anyhow::Result<Box<dyn DemoScene>> {
    let scene = &mut context.scene;

    let ambient_light = AmbientLight::new(0xffffff, 0.5);
    let ambient = scene.add(Object3D::new(
        "Ambient light",
        ObjectKind::AmbientLight(ambient_light),
    ));

    let sun_light = DirectionalLight::new(0xffffff, 1.5);
    let sun = scene.add(Object3D::new(
        "Directional light",
        ObjectKind::DirectionalLight(sun_light),
    ));

    let material = scene.add_material(Material::lambert(0xffffff).with_name("Lambert"));

    let sphere = scene.add_geometry(Geometry::sphere(0.5, 32, 16));
    let sphere = scene.add(Object3D::mesh("Sphere", sphere, material));
    scene.set_object_translation(sphere, Vec3::new(-1.5, 0.0, 0.0));

    let cube = scene.add_geometry(Geometry::cuboid(0.75, 0.75, 0.75));
    scene.add(Object3D::mesh("Cube", cube, material));

    let ball_material = scene.add_material(Material::lambert(0xff7f50).with_name("Coral"));
    let ball = scene.add_geometry(Geometry::sphere(0.35, 24, 12));
    let ball = scene.add(Object3D::mesh("Ball", ball, ball_material));
    scene.set_object_translation(ball, Vec3::new(1.5, -0.15, 0.0));

    let plane = scene.add_geometry(Geometry::plane(5.0, 5.0));
    let floor = scene.add(Object3D::mesh("Floor", plane, material));
    scene.set_object_transform(
        floor,
        Vec3::new(0.0, -0.5, 0.0),
        Quat::from_rotation_x(-FRAC_PI_2),
        Vec3::ONE,
    );

    let grid = scene.add_line_set(grid_helper(
        10.0,
        10,
        Color::from_hex(0x444444),
        Color::from_hex(0x888888),
    ));
    let grid = scene.add(Object3D::new("Grid helper", ObjectKind::Lines(grid)));
    scene.set_object_translation(grid, Vec3::new(0.0, -0.51, 0.0));

    context.camera = PerspectiveCamera::new(75.0, 4.0 / 3.0).with_position(Vec3::new(1.0, 1.0, 3.0));
    context.orbit_around(Vec3::ZERO).enable_damping = true;

    let lights = Lights {
        ambient,
        sun,
        ambient_light,
        sun_light,
        sun_speed: 0.3,
        sun_angle: 0.6,
    };
    lights.place_sun(context);

    Ok(Box::new(lights))
}

impl Lights {
    fn place_sun(&self, context: &mut SceneContext) {
        let position = Vec3::new(
            self.sun_angle.cos() * SUN_RADIUS,
            SUN_HEIGHT,
            self.sun_angle.sin() * SUN_RADIUS,
        );
        context.scene.set_object_translation(self.sun, position);
    }

    fn sync_lights(&self, context: &mut SceneContext) {
        if let Some(object) = context.scene.get_object_mut(self.ambient) {
            object.kind = ObjectKind::AmbientLight(self.ambient_light);
        }
        if let Some(object) = context.scene.get_object_mut(self.sun) {
            object.kind = ObjectKind::DirectionalLight(self.sun_light);
        }
    }
}

impl DemoScene for Lights {
    fn update(&mut self, context: &mut SceneContext, frame: &FrameInput) {
        self.sun_angle += frame.delta * self.sun_speed;
        self.place_sun(context);
    }

    fn debug_ui(&mut self, context: &mut SceneContext, ui: &imgui::Ui) {
        let mut changed = false;

        if ui.collapsing_header("Ambient light", TreeNodeFlags::DEFAULT_OPEN) {
            let mut color = self.ambient_light.color.to_array();
            if ui.color_edit3("Ambient color", &mut color) {
                self.ambient_light.color = Color::from_array(color);
                changed = true;
            }
            changed |= ui.slider("Ambient intensity", 0.0, 3.0, &mut self.ambient_light.intensity);
        }

        if ui.collapsing_header("Directional light", TreeNodeFlags::DEFAULT_OPEN) {
            let mut color = self.sun_light.color.to_array();
            if ui.color_edit3("Light color", &mut color) {
                self.sun_light.color = Color::from_array(color);
                changed = true;
            }
            changed |= ui.slider("Light intensity", 0.0, 5.0, &mut self.sun_light.intensity);
            ui.slider("Orbit speed", -2.0, 2.0, &mut self.sun_speed);
        }

        if changed {
            self.sync_lights(context);
        }
    }
}
