use std::ops::Range;

use itertools::Itertools;

use crate::{
    rendering::instance::InstanceData,
    scene_graph::{
        geometry::GeometryId, helpers::LineSetId, material::MaterialId, Object3D, ObjectId,
        ObjectKind, Scene,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshBatch {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub instances: Range<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBatch {
    pub line_set: LineSetId,
    pub instances: Range<u32>,
}

/// Visible drawables of a frame, grouped so that each distinct geometry/material pair is one
/// instanced draw. All instances share one buffer; batches index into it.
#[derive(Debug, Default)]
pub struct FrameBatches {
    pub instances: Vec<InstanceData>,
    pub meshes: Vec<MeshBatch>,
    pub lines: Vec<LineBatch>,
}

impl FrameBatches {
    pub fn gather(scene: &Scene) -> Self {
        let mut batches = FrameBatches::default();

        let mesh_groups = scene
            .visible_objects()
            .filter_map(|(id, object)| match object.kind {
                ObjectKind::Mesh { geometry, material } => Some(((geometry, material), id)),
                _ => None,
            })
            .into_group_map();

        for ((geometry, material), ids) in mesh_groups
            .into_iter()
            .sorted_by_key(|((geometry, material), _)| (geometry.index(), material.index()))
        {
            let instances = batches.push_instances(scene, &ids);
            batches.meshes.push(MeshBatch {
                geometry,
                material,
                instances,
            });
        }

        let line_groups = scene
            .visible_objects()
            .filter_map(|(id, object)| match object.kind {
                ObjectKind::Lines(line_set) => Some((line_set, id)),
                _ => None,
            })
            .into_group_map();

        for (line_set, ids) in line_groups
            .into_iter()
            .sorted_by_key(|(line_set, _)| line_set.index())
        {
            let instances = batches.push_instances(scene, &ids);
            batches.lines.push(LineBatch {
                line_set,
                instances,
            });
        }

        batches
    }

    fn push_instances(&mut self, scene: &Scene, ids: &[ObjectId]) -> Range<u32> {
        let start = self.instances.len() as u32;
        self.instances.extend(
            ids.iter()
                .filter_map(|id| scene.get_object(*id))
                .map(instance_data),
        );
        start..self.instances.len() as u32
    }
}

fn instance_data(object: &Object3D) -> InstanceData {
    InstanceData {
        model: *object.transform.get_world_matrix(),
        normal: *object.transform.get_normal_matrix(),
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::scene_graph::{helpers::axes_helper, Geometry, Material};

    #[test]
    fn shared_geometry_and_material_make_one_batch() {
        let mut scene = Scene::new();
        let cube = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
        let red = scene.add_material(Material::basic(0xff0000));
        let green = scene.add_material(Material::basic(0x00ff00));

        let a = scene.add(Object3D::mesh("A", cube, red));
        let b = scene.add(Object3D::mesh("B", cube, red));
        scene.add(Object3D::mesh("C", cube, green));
        scene.set_object_translation(a, Vec3::X);
        scene.set_object_translation(b, Vec3::Y);
        scene.late_update();

        let batches = FrameBatches::gather(&scene);

        assert_eq!(batches.instances.len(), 3);
        assert_eq!(
            batches.meshes,
            vec![
                MeshBatch {
                    geometry: cube,
                    material: red,
                    instances: 0..2,
                },
                MeshBatch {
                    geometry: cube,
                    material: green,
                    instances: 2..3,
                },
            ]
        );
        assert_eq!(
            batches.instances[0].model,
            Mat4::from_translation(Vec3::X)
        );
        assert_eq!(
            batches.instances[1].model,
            Mat4::from_translation(Vec3::Y)
        );
    }

    #[test]
    fn hidden_subtrees_are_not_drawn() {
        let mut scene = Scene::new();
        let cube = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
        let material = scene.add_material(Material::basic(0xffffff));

        let group = scene.add(Object3D::group("Group"));
        scene.add_child(group, Object3D::mesh("Inside", cube, material));
        scene.add(Object3D::mesh("Outside", cube, material));
        scene.set_object_visible(group, false);
        scene.late_update();

        let batches = FrameBatches::gather(&scene);
        assert_eq!(batches.instances.len(), 1);
        assert_eq!(batches.meshes[0].instances, 0..1);
    }

    #[test]
    fn lines_follow_meshes_in_the_instance_buffer() {
        let mut scene = Scene::new();
        let cube = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
        let material = scene.add_material(Material::basic(0xffffff));
        scene.add(Object3D::mesh("Cube", cube, material));

        let axes = scene.add_line_set(axes_helper(1.0));
        let helper = scene.add(Object3D::new("Axes", ObjectKind::Lines(axes)));
        scene.set_object_translation(helper, Vec3::Z);

        // Groups don't draw anything
        scene.add(Object3D::group("Empty"));
        scene.late_update();

        let batches = FrameBatches::gather(&scene);
        assert_eq!(
            batches.lines,
            vec![LineBatch {
                line_set: axes,
                instances: 1..2,
            }]
        );
        assert_eq!(batches.instances[1].model, Mat4::from_translation(Vec3::Z));
    }

    #[test]
    fn empty_scene_has_no_batches() {
        let batches = FrameBatches::gather(&Scene::new());
        assert!(batches.instances.is_empty());
        assert!(batches.meshes.is_empty() && batches.lines.is_empty());
    }
}
