use glam::{Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    local_matrix: RefCell<Mat4>,
    world_matrix: RefCell<Mat4>,
    normal_matrix: RefCell<Mat4>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            world_matrix: RefCell::new(Mat4::IDENTITY),
            normal_matrix: RefCell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
        }
    }

    pub fn get_local_matrix(&self) -> Ref<Mat4> {
        if self.local_dirty.get() {
            let matrix =
                Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation);

            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
        }

        self.local_matrix.borrow()
    }

    pub fn get_world_matrix(&self) -> Ref<Mat4> {
        self.world_matrix.borrow()
    }

    /// Inverse transpose of the world matrix, for transforming normals.
    pub fn get_normal_matrix(&self) -> Ref<Mat4> {
        self.normal_matrix.borrow()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.world_dirty.set(false);

        // Zero scale makes the matrix singular; such objects are invisible anyway
        let normal_matrix = if world_matrix.determinant().abs() > f32::EPSILON {
            world_matrix.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        self.normal_matrix.replace(normal_matrix);
    }

    pub fn invalidate_local(&self) {
        self.local_dirty.set(true);
        self.world_dirty.set(true);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate_local();
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.invalidate_local();
    }

    pub fn set_transform(&mut self, translation: Vec3, rotation: Quat, scale: Vec3) {
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
        self.invalidate_local();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_matrix_tracks_changes() {
        let mut transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            transform.get_local_matrix().transform_point3(Vec3::ZERO),
            Vec3::new(1.0, 2.0, 3.0)
        );

        transform.set_transform(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, Vec3::splat(2.0));
        assert!(transform.is_world_dirty());
        assert_eq!(
            transform.get_local_matrix().transform_point3(Vec3::X),
            Vec3::new(3.0, 2.0, 3.0)
        );
    }

    #[test]
    fn zero_scale_has_identity_normal_matrix() {
        let transform = Transform::default();
        transform.set_world_matrix(Mat4::from_scale(Vec3::ZERO));
        assert_eq!(*transform.get_normal_matrix(), Mat4::IDENTITY);
        assert!(!transform.is_world_dirty());
    }
}
