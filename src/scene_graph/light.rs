use crate::color::Color;

/// Uniform light applied to every surface regardless of orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: impl Into<Color>, intensity: f32) -> Self {
        Self {
            color: color.into(),
            intensity,
        }
    }
}

/// Parallel light shining from the owning object's world position toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(color: impl Into<Color>, intensity: f32) -> Self {
        Self {
            color: color.into(),
            intensity,
        }
    }
}
