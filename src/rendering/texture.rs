use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::scene_graph::texture::TextureData;

/// A sampled colour texture uploaded from decoded RGBA8 data.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
}

impl GpuTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn from_data(device: &wgpu::Device, queue: &wgpu::Queue, data: &TextureData) -> Self {
        Self::create(device, queue, &data.name, data.width, data.height, &data.rgba)
    }

    /// 1x1 white texture bound for materials without a map.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::create(device, queue, "Default texture (white)", 1, 1, &[255; 4])
    }

    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::wgt::TextureDataOrder::default(),
            rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
        }
    }
}

pub struct DepthTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    label: String,
}

impl DepthTexture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>, label: impl Into<String>) -> Self {
        let label: String = label.into();
        let texture = Self::create_wgpu_texture(device, size, &label);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        DepthTexture {
            _texture: texture,
            view,
            label,
        }
    }

    fn create_wgpu_texture(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        label: &str,
    ) -> wgpu::Texture {
        let size = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };

        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        *self = Self::new(device, size, std::mem::take(&mut self.label));
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
