use glam::{Quat, Vec3};

use crate::{
    camera::PerspectiveCamera,
    color::Color,
    demo::{DemoScene, FrameInput, SceneContext},
    scene_graph::{texture::TextureData, Geometry, Material, MaterialId, Object3D, ObjectId},
};

const CRATE_TEXTURE: &str = "assets/textures/crate.png";

/// Textured cubes on a checkerboard floor. The crate texture comes from disk;
/// if it can't be read the cube is simply drawn untextured.
pub struct Textures {
    cubes: [ObjectId; 2],
    crate_material: MaterialId,
    crate_loaded: bool,
    spin: bool,
    angle: f32,
}

pub fn setup(context: &mut SceneContext) -> anyhow::Result<Box<dyn DemoScene>> {
    let scene = &mut context.scene;
    scene.background = Color::from_hex(0x1a1a2e);

    let cube = Geometry::cuboid(1.0, 1.0, 1.0);
    let cube_radius = cube.bounding_radius();
    let cube = scene.add_geometry(cube);

    let crate_texture = scene.load_texture(CRATE_TEXTURE);
    let crate_material = scene.add_material(
        Material::basic(0xffffff)
            .with_name("Crate")
            .with_map(crate_texture),
    );
    let crate_cube = scene.add(Object3D::mesh("Crate", cube, crate_material));
    scene.set_object_translation(crate_cube, Vec3::new(-0.9, 0.5, 0.0));

    let checker = scene.add_texture(TextureData::checkerboard(
        256,
        8,
        Color::from_hex(0xffffff),
        Color::from_hex(0x3355ff),
    ));
    let checker_material = scene.add_material(
        Material::basic(0xffffff)
            .with_name("Checker")
            .with_map(Some(checker)),
    );
    let checker_cube = scene.add(Object3D::mesh("Checker cube", cube, checker_material));
    scene.set_object_translation(checker_cube, Vec3::new(0.9, 0.5, 0.0));

    let floor_texture = scene.add_texture(TextureData::checkerboard(
        512,
        16,
        Color::from_hex(0x888888),
        Color::from_hex(0x444444),
    ));
    let floor_material = scene.add_material(
        Material::basic(0xffffff)
            .with_name("Floor")
            .with_map(Some(floor_texture)),
    );
    let floor_geometry = scene.add_geometry(Geometry::plane(6.0, 6.0));
    let floor = scene.add(Object3D::mesh("Floor", floor_geometry, floor_material));
    scene.set_object_rotation(floor, Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2));

    context.camera =
        PerspectiveCamera::new(75.0, 4.0 / 3.0).with_position(Vec3::new(1.5, 2.0, 3.0));
    let controls = context.orbit_around(Vec3::new(0.0, 0.5, 0.0));
    controls.enable_damping = true;
    // Keep the camera outside the cubes
    controls.min_distance = cube_radius * 2.0;

    Ok(Box::new(Textures {
        cubes: [crate_cube, checker_cube],
        crate_material,
        crate_loaded: crate_texture.is_some(),
        spin: true,
        angle: 0.0,
    }))
}

impl DemoScene for Textures {
    fn update(&mut self, context: &mut SceneContext, frame: &FrameInput) {
        if !self.spin {
            return;
        }

        self.angle += frame.delta * 0.5;
        for (i, cube) in self.cubes.iter().enumerate() {
            let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            context
                .scene
                .set_object_rotation(*cube, Quat::from_rotation_y(self.angle * direction));
        }
    }

    fn debug_ui(&mut self, context: &mut SceneContext, ui: &imgui::Ui) {
        if self.crate_loaded {
            ui.text(format!("Loaded {CRATE_TEXTURE}"));
        } else {
            ui.text_disabled(format!("{CRATE_TEXTURE} not found"));
        }

        if let Some(material) = context.scene.get_material_mut(self.crate_material) {
            let mut tint = material.color.to_array();
            if ui.color_edit3("Crate tint", &mut tint) {
                material.color = Color::from_array(tint);
            }
        }

        ui.checkbox("Spin", &mut self.spin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::ObjectKind;

    #[test]
    fn every_mesh_has_a_material() {
        let mut context = SceneContext::new();
        setup(&mut context).unwrap();

        let scene = &context.scene;
        let meshes = scene
            .objects
            .iter()
            .filter_map(|(_, object)| match object.kind {
                ObjectKind::Mesh { material, .. } => Some(material),
                _ => None,
            })
            .collect::<Vec<_>>();

        assert_eq!(meshes.len(), 3);
        assert!(meshes.iter().all(|id| scene.materials.get(*id).is_some()));
        let controls = context.controls.as_ref().unwrap();
        assert!(controls.min_distance > 1.0);
    }

    #[test]
    fn procedural_textures_are_always_present() {
        let mut context = SceneContext::new();
        setup(&mut context).unwrap();

        let checker = context
            .scene
            .materials
            .iter()
            .find(|(_, material)| material.name == "Checker")
            .map(|(_, material)| material.map)
            .unwrap();
        assert!(checker.is_some());
    }
}
