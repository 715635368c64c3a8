use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::scene_graph::{ObjectKind, Scene};

pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct DirectionalLightData {
    /// Unit vector pointing from the origin toward the light
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    pub directional: [DirectionalLightData; MAX_DIRECTIONAL_LIGHTS],
    pub directional_count: u32,
    _padding: [u32; 3],
}

impl LightUniform {
    /// Collects the visible lights of a scene. Ambient lights add up; directional lights past
    /// the first four are dropped.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut uniform = Self::default();
        let mut ambient = Vec3::ZERO;
        let mut dropped = 0;

        for (id, object) in scene.visible_objects() {
            match object.kind {
                ObjectKind::AmbientLight(light) => {
                    ambient += Vec3::from_array(light.color.scaled(light.intensity));
                }
                ObjectKind::DirectionalLight(light) => {
                    let count = uniform.directional_count as usize;
                    if count == MAX_DIRECTIONAL_LIGHTS {
                        dropped += 1;
                        continue;
                    }

                    let direction = scene.world_position(id).try_normalize().unwrap_or(Vec3::Y);
                    uniform.directional[count] = DirectionalLightData {
                        direction: direction.extend(0.0).to_array(),
                        color: Vec3::from_array(light.color.scaled(light.intensity))
                            .extend(1.0)
                            .to_array(),
                    };
                    uniform.directional_count += 1;
                }
                _ => {}
            }
        }

        if dropped > 0 {
            log::trace!("Ignoring {dropped} directional lights over the limit");
        }

        uniform.ambient = ambient.extend(1.0).to_array();
        uniform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::{
        light::{AmbientLight, DirectionalLight},
        Object3D,
    };

    #[test]
    fn layout_matches_shader() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 160);
    }

    #[test]
    fn ambient_lights_add_up() {
        let mut scene = Scene::new();
        scene.add(Object3D::new(
            "A",
            ObjectKind::AmbientLight(AmbientLight::new(0xffffff, 0.25)),
        ));
        scene.add(Object3D::new(
            "B",
            ObjectKind::AmbientLight(AmbientLight::new(0xff0000, 0.5)),
        ));

        let uniform = LightUniform::from_scene(&scene);
        assert!((uniform.ambient[0] - 0.75).abs() < 1e-5);
        assert!((uniform.ambient[1] - 0.25).abs() < 1e-5);
        assert_eq!(uniform.directional_count, 0);
    }

    #[test]
    fn directional_light_points_at_its_position() {
        let mut scene = Scene::new();
        let light = scene.add(Object3D::new(
            "Sun",
            ObjectKind::DirectionalLight(DirectionalLight::new(0xffffff, 2.0)),
        ));
        scene.set_object_translation(light, Vec3::new(0.0, 3.0, 4.0));
        scene.late_update();

        let uniform = LightUniform::from_scene(&scene);
        assert_eq!(uniform.directional_count, 1);
        let direction = glam::Vec4::from_array(uniform.directional[0].direction);
        assert!(direction.abs_diff_eq(glam::Vec4::new(0.0, 0.6, 0.8, 0.0), 1e-6));
        let color = glam::Vec4::from_array(uniform.directional[0].color);
        assert!(color.abs_diff_eq(glam::Vec4::new(2.0, 2.0, 2.0, 1.0), 1e-5));
    }

    #[test]
    fn hidden_and_excess_lights_are_skipped() {
        let mut scene = Scene::new();
        for i in 0..6 {
            let id = scene.add(Object3D::new(
                format!("Sun {i}"),
                ObjectKind::DirectionalLight(DirectionalLight::new(0xffffff, 1.0)),
            ));
            if i == 0 {
                scene.set_object_visible(id, false);
            }
        }
        scene.late_update();

        let uniform = LightUniform::from_scene(&scene);
        assert_eq!(uniform.directional_count, MAX_DIRECTIONAL_LIGHTS as u32);
        // Lights at the origin fall back to shining straight down
        assert_eq!(uniform.directional[0].direction, [0.0, 1.0, 0.0, 0.0]);
    }
}
