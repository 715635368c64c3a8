use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use id_arena::Id;
use itertools::iproduct;

pub type GeometryId = Id<Geometry>;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Indexed triangle list, counter-clockwise front faces.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

struct Face {
    normal: Vec3,
    u: Vec3,
    v: Vec3,
}

const CUBOID_FACES: [Face; 6] = [
    Face {
        normal: Vec3::X,
        u: Vec3::NEG_Z,
        v: Vec3::Y,
    },
    Face {
        normal: Vec3::NEG_X,
        u: Vec3::Z,
        v: Vec3::Y,
    },
    Face {
        normal: Vec3::Y,
        u: Vec3::X,
        v: Vec3::NEG_Z,
    },
    Face {
        normal: Vec3::NEG_Y,
        u: Vec3::X,
        v: Vec3::Z,
    },
    Face {
        normal: Vec3::Z,
        u: Vec3::X,
        v: Vec3::Y,
    },
    Face {
        normal: Vec3::NEG_Z,
        u: Vec3::NEG_X,
        v: Vec3::Y,
    },
];

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        let extent = |axis: Vec3| axis.dot(half).abs();

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for face in &CUBOID_FACES {
            let base = vertices.len() as u32;
            let center = face.normal * extent(face.normal);
            let u = face.u * extent(face.u);
            let v = face.v * extent(face.v);

            // Bottom left, bottom right, top right, top left as seen from outside
            for (s, t) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                vertices.push(Vertex {
                    position: center + u * s + v * t,
                    normal: face.normal,
                    uv: Vec2::new((s + 1.0) * 0.5, (1.0 - t) * 0.5),
                });
            }

            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            name: format!("Box {width}x{height}x{depth}"),
            vertices,
            indices,
        }
    }

    /// A rectangle in the XY plane, facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let half = Vec2::new(width, height) * 0.5;

        let vertices = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .into_iter()
            .map(|(s, t)| Vertex {
                position: Vec3::new(half.x * s, half.y * t, 0.0),
                normal: Vec3::Z,
                uv: Vec2::new((s + 1.0) * 0.5, (1.0 - t) * 0.5),
            })
            .collect();

        Self {
            name: format!("Plane {width}x{height}"),
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row_length = width_segments + 1;

        let vertices = iproduct!(0..=height_segments, 0..=width_segments)
            .map(|(iy, ix)| {
                let u = ix as f32 / width_segments as f32;
                let v = iy as f32 / height_segments as f32;

                let normal = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );

                Vertex {
                    position: normal * radius,
                    normal,
                    uv: Vec2::new(u, v),
                }
            })
            .collect();

        let mut indices = Vec::new();
        for (iy, ix) in iproduct!(0..height_segments, 0..width_segments) {
            let a = iy * row_length + ix + 1;
            let b = iy * row_length + ix;
            let c = (iy + 1) * row_length + ix;
            let d = (iy + 1) * row_length + ix + 1;

            // The pole rows collapse to a point, so they only get one triangle
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }

        Self {
            name: format!("Sphere {radius}"),
            vertices,
            indices,
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|vertex| vertex.position.length())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles(geometry: &Geometry) -> impl Iterator<Item = [&Vertex; 3]> {
        geometry.indices.chunks_exact(3).map(|triangle| {
            [
                &geometry.vertices[triangle[0] as usize],
                &geometry.vertices[triangle[1] as usize],
                &geometry.vertices[triangle[2] as usize],
            ]
        })
    }

    fn face_normal([a, b, c]: [&Vertex; 3]) -> Vec3 {
        (b.position - a.position).cross(c.position - a.position)
    }

    #[test]
    fn cuboid_layout() {
        let geometry = Geometry::cuboid(1.0, 1.0, 1.0);
        assert_eq!(geometry.vertices.len(), 24);
        assert_eq!(geometry.indices.len(), 36);

        for vertex in &geometry.vertices {
            assert_eq!(vertex.position.abs(), Vec3::splat(0.5));
            assert!(vertex.uv.cmpge(Vec2::ZERO).all() && vertex.uv.cmple(Vec2::ONE).all());
        }
    }

    #[test]
    fn cuboid_faces_point_outward() {
        let geometry = Geometry::cuboid(2.0, 1.0, 3.0);

        for triangle in triangles(&geometry) {
            let normal = face_normal(triangle);
            assert!(normal.dot(triangle[0].normal) > 0.0);
            assert!(triangle[0].position.dot(triangle[0].normal) > 0.0);
        }
    }

    #[test]
    fn cuboid_extents() {
        let geometry = Geometry::cuboid(2.0, 4.0, 6.0);
        let max = geometry
            .vertices
            .iter()
            .fold(Vec3::ZERO, |acc, vertex| acc.max(vertex.position));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn plane_faces_positive_z() {
        let geometry = Geometry::plane(4.0, 2.0);
        for triangle in triangles(&geometry) {
            assert!(face_normal(triangle).z > 0.0);
        }
        assert_eq!(geometry.bounding_radius(), Vec2::new(2.0, 1.0).length());
    }

    #[test]
    fn sphere_counts_and_radius() {
        let geometry = Geometry::sphere(2.0, 8, 4);
        assert_eq!(geometry.vertices.len(), 9 * 5);
        assert_eq!(geometry.indices.len(), 6 * 8 * 3);
        assert!((geometry.bounding_radius() - 2.0).abs() < 1e-5);
        assert!(geometry
            .indices
            .iter()
            .all(|&index| (index as usize) < geometry.vertices.len()));
    }

    #[test]
    fn sphere_faces_point_outward() {
        let geometry = Geometry::sphere(1.0, 16, 12);

        for triangle in triangles(&geometry) {
            let normal = face_normal(triangle);
            if normal.length_squared() < 1e-10 {
                continue;
            }

            let centroid = (triangle[0].position + triangle[1].position + triangle[2].position) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }
}
