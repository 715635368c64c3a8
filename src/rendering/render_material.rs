use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::scene_graph::{texture::TextureId, Material, MaterialKind};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// Linear RGB, alpha unused
    pub color: [f32; 4],
    /// x: lit, y: has map
    pub flags: [u32; 4],
}

impl MaterialUniform {
    pub fn new(material: &Material, has_map: bool) -> Self {
        let [r, g, b] = material.color.to_linear();
        let lit = material.kind == MaterialKind::Lambert;

        Self {
            color: [r, g, b, 1.0],
            flags: [lit as u32, has_map as u32, 0, 0],
        }
    }
}

pub struct RenderMaterial {
    /// Texture bound at creation; a different map needs a new bind group
    pub texture: Option<TextureId>,
    uniform: MaterialUniform,
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl RenderMaterial {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        material: &Material,
        map: Option<(TextureId, &wgpu::TextureView)>,
        fallback: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let uniform = MaterialUniform::new(material, map.is_some());
        let view = map.map_or(fallback, |(_, view)| view);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Material uniform ({})", material.name)),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Material bind group ({})", material.name)),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            texture: map.map(|(id, _)| id),
            uniform,
            buffer,
            bind_group,
        }
    }

    /// Uploads the material's colour and kind if they changed since the last frame.
    pub fn update(&mut self, queue: &wgpu::Queue, material: &Material) {
        let has_map = self.uniform.flags[1] != 0;
        let uniform = MaterialUniform::new(material, has_map);

        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_material_kind() {
        let basic = MaterialUniform::new(&Material::basic(0xff0000), false);
        assert_eq!(basic.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(basic.flags, [0, 0, 0, 0]);

        let lambert = MaterialUniform::new(&Material::lambert(0xffffff), true);
        assert_eq!(lambert.flags, [1, 1, 0, 0]);
    }

    #[test]
    fn layout_matches_shader() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
    }
}
