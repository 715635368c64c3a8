use id_arena::Id;

use crate::{color::Color, scene_graph::texture::TextureId};

pub type MaterialId = Id<Material>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Flat colour, not affected by lights.
    Basic,
    /// Diffuse shading from the scene's ambient and directional lights.
    Lambert,
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    pub color: Color,
    pub map: Option<TextureId>,
}

impl Material {
    pub fn basic(color: impl Into<Color>) -> Self {
        Self {
            name: "Basic material".to_string(),
            kind: MaterialKind::Basic,
            color: color.into(),
            map: None,
        }
    }

    pub fn lambert(color: impl Into<Color>) -> Self {
        Self {
            name: "Lambert material".to_string(),
            kind: MaterialKind::Lambert,
            color: color.into(),
            map: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_map(mut self, map: Option<TextureId>) -> Self {
        self.map = map;
        self
    }
}
