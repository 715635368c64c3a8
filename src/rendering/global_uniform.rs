use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::color::Color;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalUniformState {
    pub background: [f32; 4],
}

impl GlobalUniformState {
    pub fn new(background: Color) -> Self {
        let [r, g, b] = background.to_linear();

        Self {
            background: [r, g, b, 1.0],
        }
    }
}

pub struct GlobalUniform {
    buffer: wgpu::Buffer,
}

impl GlobalUniform {
    pub fn new(device: &wgpu::Device, initial_state: GlobalUniformState) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global uniform buffer"),
            contents: bytemuck::cast_slice(&[initial_state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self { buffer }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn update(&self, queue: &wgpu::Queue, state: GlobalUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[state]));
    }
}
