use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;

use crate::color::Color;
use crate::scene_graph::geometry::{Geometry, GeometryId};
use crate::scene_graph::helpers::{LineSet, LineSetId};
use crate::scene_graph::material::{Material, MaterialId};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::texture::{TextureData, TextureId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub geometries: Arena<Geometry>,
    pub materials: Arena<Material>,
    pub line_sets: Arena<LineSet>,
    pub textures: Arena<TextureData>,
    pub background: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            geometries: Arena::new(),
            materials: Arena::new(),
            line_sets: Arena::new(),
            textures: Arena::new(),
            background: Color::BLACK,
        }
    }

    pub fn add(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn add_child(&mut self, parent_id: ObjectId, object: Object3D) -> ObjectId {
        let object_id = self.add(object);
        self.set_object_parent(object_id, Some(parent_id));
        object_id
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.alloc(geometry)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.alloc(material)
    }

    pub fn add_line_set(&mut self, line_set: LineSet) -> LineSetId {
        self.line_sets.alloc(line_set)
    }

    pub fn add_texture(&mut self, texture: TextureData) -> TextureId {
        self.textures.alloc(texture)
    }

    /// Loads a texture from disk. A missing or broken file is not an error for
    /// the scene: it is logged and the caller gets `None`.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Option<TextureId> {
        match TextureData::load(path) {
            Ok(texture) => {
                log::info!(
                    "Loaded texture {} ({}x{})",
                    texture.name,
                    texture.width,
                    texture.height
                );
                Some(self.add_texture(texture))
            }
            Err(e) => {
                log::warn!("{:#}", e);
                None
            }
        }
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    #[cfg(test)]
    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn get_material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Updates all object transforms in hierarchical order
    fn update_transforms(&self) {
        let root_objects = self.objects.iter().filter_map(|(id, object)| {
            if object.parent_id.is_none() {
                Some(id)
            } else {
                None
            }
        });

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY);
        }
    }

    fn update_object_transform_recursive(&self, object_id: ObjectId, parent_world_matrix: Mat4) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                object
                    .transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if new_parent_id == Some(child_id) {
            log::warn!("Refusing to parent an object to itself");
            return;
        }

        if let Some(new_parent_id) = new_parent_id {
            if self.is_ancestor(child_id, new_parent_id) {
                log::warn!("Refusing to parent an object to one of its descendants");
                return;
            }
        }

        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|c| c.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }

        self.invalidate_object_hierarchy(child_id);
    }

    fn is_ancestor(&self, ancestor_id: ObjectId, object_id: ObjectId) -> bool {
        let mut current = self.objects.get(object_id).and_then(|object| object.parent_id);

        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            current = self.objects.get(id).and_then(|object| object.parent_id);
        }

        false
    }

    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        self.update_object_transform(object_id, |transform| {
            transform.set_translation(translation)
        });
    }

    pub fn set_object_rotation(&mut self, object_id: ObjectId, rotation: Quat) {
        self.update_object_transform(object_id, |transform| transform.set_rotation(rotation));
    }

    pub fn set_object_transform(
        &mut self,
        object_id: ObjectId,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) {
        self.update_object_transform(object_id, |transform| {
            transform.set_transform(translation, rotation, scale)
        });
    }

    fn update_object_transform(&mut self, object_id: ObjectId, f: impl FnOnce(&mut Transform)) {
        if let Some(object) = self.objects.get_mut(object_id) {
            f(&mut object.transform);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn set_object_visible(&mut self, object_id: ObjectId, visible: bool) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.visible = visible;
        }
    }

    /// An object is drawn only if it and all of its ancestors are visible.
    pub fn is_visible_in_world(&self, object_id: ObjectId) -> bool {
        let mut current = self.objects.get(object_id);

        while let Some(object) = current {
            if !object.visible {
                return false;
            }
            current = object.parent(self);
        }

        true
    }

    /// World matrix as of the last `late_update`.
    pub fn world_matrix(&self, object_id: ObjectId) -> Mat4 {
        self.objects
            .get(object_id)
            .map(|object| *object.transform.get_world_matrix())
            .unwrap_or(Mat4::IDENTITY)
    }

    pub fn world_position(&self, object_id: ObjectId) -> Vec3 {
        self.world_matrix(object_id).transform_point3(Vec3::ZERO)
    }

    pub fn visible_objects(&self) -> impl Iterator<Item = (ObjectId, &Object3D)> {
        self.objects
            .iter()
            .filter(|(id, _)| self.is_visible_in_world(*id))
    }

    pub fn late_update(&mut self) {
        self.update_transforms();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
