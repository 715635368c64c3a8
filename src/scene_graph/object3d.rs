use id_arena::Id;

use crate::scene_graph::{
    geometry::GeometryId,
    helpers::LineSetId,
    light::{AmbientLight, DirectionalLight},
    material::MaterialId,
    scene::Scene,
    transform::Transform,
};

pub type ObjectId = Id<Object3D>;

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Group,
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    Lines(LineSetId),
    AmbientLight(AmbientLight),
    DirectionalLight(DirectionalLight),
}

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub kind: ObjectKind,
    pub visible: bool,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: GeometryId, material: MaterialId) -> Self {
        Self::new(name, ObjectKind::Mesh { geometry, material })
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a Object3D> {
        self.parent_id.and_then(|id| scene.get_object(id))
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::default(),
            kind: ObjectKind::Group,
            visible: true,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
