use glam::{EulerRot, Quat, Vec3};
use imgui::{Drag, TreeNodeFlags};

use crate::{
    camera::PerspectiveCamera,
    demo::{DemoScene, SceneContext},
    scene_graph::{
        helpers::axes_helper, Geometry, Material, Object3D, ObjectId, ObjectKind, Scene,
    },
};

/// Three cubes in a group lifted one unit up, with an axes helper at the origin.
pub struct TransformObjects {
    group: ObjectId,
    cubes: Vec<(&'static str, ObjectId, bool)>,
    position: [f32; 3],
    rotation_degrees: [f32; 3],
    scale: f32,
}

pub fn setup(context: &mut SceneContext) -> anyhow::Result<Box<dyn DemoScene>> {
    let scene = &mut context.scene;

    let group = scene.add(Object3D::group("Group"));
    scene.set_object_translation(group, Vec3::Y);

    let geometry = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));

    let cube = |scene: &mut Scene, name: &'static str, color: u32, x: f32| {
        let material = scene.add_material(Material::basic(color).with_name(name));
        let id = scene.add_child(group, Object3D::mesh(name, geometry, material));
        scene.set_object_translation(id, Vec3::new(x, 0.0, 0.0));
        (name, id, true)
    };

    let cubes = vec![
        cube(scene, "Red cube", 0xff0000, 0.0),
        cube(scene, "Green cube", 0x00ff00, -2.0),
        cube(scene, "Yellow cube", 0xffff00, 2.0),
    ];

    let axes = scene.add_line_set(axes_helper(1.0));
    scene.add(Object3D::new("Axes helper", ObjectKind::Lines(axes)));

    context.camera = PerspectiveCamera::new(75.0, 4.0 / 3.0).with_position(Vec3::Z * 5.0);

    Ok(Box::new(TransformObjects {
        group,
        cubes,
        position: [0.0, 1.0, 0.0],
        rotation_degrees: [0.0; 3],
        scale: 1.0,
    }))
}

impl TransformObjects {
    fn apply_group_transform(&self, scene: &mut Scene) {
        let [x, y, z] = self.rotation_degrees.map(f32::to_radians);
        scene.set_object_transform(
            self.group,
            Vec3::from_array(self.position),
            Quat::from_euler(EulerRot::XYZ, x, y, z),
            Vec3::splat(self.scale),
        );
    }
}

impl DemoScene for TransformObjects {
    fn debug_ui(&mut self, context: &mut SceneContext, ui: &imgui::Ui) {
        if ui.collapsing_header("Group", TreeNodeFlags::DEFAULT_OPEN) {
            let mut changed = Drag::new("Position")
                .speed(0.01)
                .build_array(ui, &mut self.position);
            changed |= ui
                .slider_config("Rotation", -180.0, 180.0)
                .build_array(&mut self.rotation_degrees);
            changed |= ui.slider("Scale", 0.1, 3.0, &mut self.scale);

            if changed {
                self.apply_group_transform(&mut context.scene);
            }
        }

        if ui.collapsing_header("Cubes", TreeNodeFlags::DEFAULT_OPEN) {
            for (name, id, visible) in &mut self.cubes {
                if ui.checkbox(*name, visible) {
                    context.scene.set_object_visible(*id, *visible);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubes_sit_in_lifted_group() {
        let mut context = SceneContext::new();
        setup(&mut context).unwrap();
        context.scene.late_update();

        let scene = &context.scene;
        let position = |name| scene.world_position(scene.get_object_by_name(name).unwrap());

        assert_eq!(position("Red cube"), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(position("Green cube"), Vec3::new(-2.0, 1.0, 0.0));
        assert_eq!(position("Yellow cube"), Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(position("Axes helper"), Vec3::ZERO);

        assert_eq!(context.camera.fov_y, 75.0);
        assert_eq!(context.camera.position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn cube_colors() {
        let mut context = SceneContext::new();
        setup(&mut context).unwrap();

        let hexes: Vec<u32> = context
            .scene
            .materials
            .iter()
            .map(|(_, material)| material.color.to_hex())
            .collect();
        assert_eq!(hexes, vec![0xff0000, 0x00ff00, 0xffff00]);
    }

    #[test]
    fn group_transform_moves_all_cubes() {
        let mut context = SceneContext::new();
        setup(&mut context).unwrap();

        let demo = TransformObjects {
            group: context.scene.get_object_by_name("Group").unwrap(),
            cubes: Vec::new(),
            position: [0.0, 2.0, 0.0],
            rotation_degrees: [0.0, 0.0, 0.0],
            scale: 2.0,
        };
        demo.apply_group_transform(&mut context.scene);
        context.scene.late_update();

        let yellow = context.scene.get_object_by_name("Yellow cube").unwrap();
        assert_eq!(context.scene.world_position(yellow), Vec3::new(4.0, 2.0, 0.0));
    }
}
