use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use id_arena::Id;

use crate::color::Color;

pub type LineSetId = Id<LineSet>;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: Vec3,
    /// Linear RGB
    pub color: [f32; 3],
}

/// Unlit line segments, two vertices per segment.
#[derive(Debug, Clone)]
pub struct LineSet {
    pub name: String,
    pub vertices: Vec<LineVertex>,
}

impl LineSet {
    fn push_segment(&mut self, from: Vec3, from_color: Color, to: Vec3, to_color: Color) {
        self.vertices.push(LineVertex {
            position: from,
            color: from_color.to_linear(),
        });
        self.vertices.push(LineVertex {
            position: to,
            color: to_color.to_linear(),
        });
    }
}

/// Red, green and blue segments along +X, +Y and +Z.
pub fn axes_helper(size: f32) -> LineSet {
    let mut lines = LineSet {
        name: "Axes helper".to_string(),
        vertices: Vec::with_capacity(6),
    };

    let axes = [
        (Vec3::X, Color::from_rgb(1.0, 0.0, 0.0), Color::from_rgb(1.0, 0.6, 0.0)),
        (Vec3::Y, Color::from_rgb(0.0, 1.0, 0.0), Color::from_rgb(0.6, 1.0, 0.0)),
        (Vec3::Z, Color::from_rgb(0.0, 0.0, 1.0), Color::from_rgb(0.0, 0.6, 1.0)),
    ];

    for (axis, start_color, end_color) in axes {
        lines.push_segment(Vec3::ZERO, start_color, axis * size, end_color);
    }

    lines
}

/// Square grid on the XZ plane centred on the origin.
pub fn grid_helper(size: f32, divisions: u32, center_color: Color, grid_color: Color) -> LineSet {
    let divisions = divisions.max(1);
    let step = size / divisions as f32;
    let half = size / 2.0;

    let mut lines = LineSet {
        name: "Grid helper".to_string(),
        vertices: Vec::with_capacity((divisions as usize + 1) * 4),
    };

    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i * 2 == divisions {
            center_color
        } else {
            grid_color
        };

        lines.push_segment(Vec3::new(-half, 0.0, k), color, Vec3::new(half, 0.0, k), color);
        lines.push_segment(Vec3::new(k, 0.0, -half), color, Vec3::new(k, 0.0, half), color);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_point_along_positive_axes() {
        let axes = axes_helper(2.0);
        assert_eq!(axes.vertices.len(), 3 * 2);

        let ends: Vec<Vec3> = axes.vertices.iter().skip(1).step_by(2).map(|v| v.position).collect();
        assert_eq!(ends, vec![Vec3::X * 2.0, Vec3::Y * 2.0, Vec3::Z * 2.0]);

        // X starts pure red
        assert_eq!(axes.vertices[0].color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn grid_covers_size() {
        let grid = grid_helper(10.0, 10, Color::from_hex(0x444444), Color::from_hex(0x888888));
        assert_eq!(grid.vertices.len(), 22 * 2);

        let max = grid
            .vertices
            .iter()
            .fold(Vec3::ZERO, |acc, vertex| acc.max(vertex.position));
        assert_eq!(max, Vec3::new(5.0, 0.0, 5.0));

        let center = Color::from_hex(0x444444).to_linear();
        assert_eq!(
            grid.vertices.iter().filter(|v| v.color == center).count(),
            4
        );
    }
}
