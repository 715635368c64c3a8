pub mod geometry;
pub mod helpers;
pub mod light;
pub mod material;
pub mod object3d;
pub mod scene;
pub mod texture;
pub mod transform;

pub use geometry::{Geometry, GeometryId};
pub use material::{Material, MaterialId, MaterialKind};
pub use object3d::{Object3D, ObjectId, ObjectKind};
pub use scene::Scene;
