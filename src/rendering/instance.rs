use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::BufferUsages;

/// Per-instance vertex data: the object's world matrix and its normal matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model: Mat4,
    pub normal: Mat4,
}

impl InstanceData {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
        10 => Float32x4,
        11 => Float32x4,
        12 => Float32x4
    ];

    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertex buffer holding every instance drawn in a frame. Grows in powers of two.
pub struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl InstanceBuffer {
    const INITIAL_CAPACITY: usize = 128;

    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            buffer: Self::create_buffer(device, Self::INITIAL_CAPACITY),
            capacity: Self::INITIAL_CAPACITY,
        }
    }

    fn create_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance buffer"),
            size: (std::mem::size_of::<InstanceData>() * capacity) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[InstanceData]) {
        if instances.is_empty() {
            return;
        }

        if instances.len() > self.capacity {
            self.capacity = instances.len().next_power_of_two();
            self.buffer = Self::create_buffer(device, self.capacity);
            log::debug!("Instance buffer grown to {} instances", self.capacity);
        }

        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(1, self.buffer.slice(..));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_two_matrices() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 128);
        assert_eq!(InstanceData::ATTRIBUTES[4].offset, 64);
        assert_eq!(InstanceData::ATTRIBUTES[7].shader_location, 12);
    }
}
