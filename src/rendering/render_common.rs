use winit::dpi::PhysicalSize;

use crate::{
    camera::CameraUniform,
    color::Color,
    rendering::{
        config::RenderConfig,
        global_uniform::{GlobalUniform, GlobalUniformState},
        lights::LightUniform,
    },
};

/// State shared by every pass: the output format and the per-frame scene uniforms
/// (camera, lights and globals) bound at group 0.
pub struct RenderCommon {
    pub surface_format: wgpu::TextureFormat,
    pub camera_uniform_buffer: wgpu::Buffer,
    pub light_uniform_buffer: wgpu::Buffer,
    pub global_uniform: GlobalUniform,
    pub scene_bind_group_layout: wgpu::BindGroupLayout,
    pub scene_bind_group: wgpu::BindGroup,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
}

impl RenderCommon {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let camera_uniform_buffer = CameraUniform::default().create_buffer(device);

        let light_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light uniform buffer"),
            size: std::mem::size_of::<LightUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let global_uniform = GlobalUniform::new(
            device,
            GlobalUniformState::new(Color::BLACK),
        );

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene bind group layout"),
                entries: &[
                    uniform_layout_entry(0),
                    uniform_layout_entry(1),
                    uniform_layout_entry(2),
                ],
            });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene bind group"),
            layout: &scene_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: global_uniform.buffer().as_entire_binding(),
                },
            ],
        });

        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material bind group layout"),
                entries: &[
                    uniform_layout_entry(0),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        Self {
            surface_format,
            camera_uniform_buffer,
            light_uniform_buffer,
            global_uniform,
            scene_bind_group_layout,
            scene_bind_group,
            material_bind_group_layout,
        }
    }

    pub fn update_lights(&self, queue: &wgpu::Queue, lights: &LightUniform) {
        queue.write_buffer(
            &self.light_uniform_buffer,
            0,
            bytemuck::cast_slice(std::slice::from_ref(lights)),
        );
    }
}

fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Builds the surface configuration, preferring an sRGB format so that linear shader output
/// is encoded on write.
pub fn surface_config(
    capabilities: &wgpu::SurfaceCapabilities,
    size: PhysicalSize<u32>,
    config: &RenderConfig,
) -> anyhow::Result<wgpu::SurfaceConfiguration> {
    let format = capabilities
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| capabilities.formats.first())
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

    let alpha_mode = capabilities
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: select_present_mode(&capabilities.present_modes, config.vsync),
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

/// Fifo is always available; without vsync prefer Mailbox, then Immediate.
pub fn select_present_mode(available: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }

    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|mode| available.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

#[cfg(test)]
mod tests {
    use wgpu::PresentMode;

    use super::*;

    #[test]
    fn vsync_always_uses_fifo() {
        let available = [PresentMode::Immediate, PresentMode::Fifo];
        assert_eq!(select_present_mode(&available, true), PresentMode::Fifo);
    }

    #[test]
    fn no_vsync_prefers_mailbox() {
        let available = [PresentMode::Fifo, PresentMode::Immediate, PresentMode::Mailbox];
        assert_eq!(select_present_mode(&available, false), PresentMode::Mailbox);

        let available = [PresentMode::Fifo, PresentMode::Immediate];
        assert_eq!(select_present_mode(&available, false), PresentMode::Immediate);

        assert_eq!(
            select_present_mode(&[PresentMode::Fifo], false),
            PresentMode::Fifo
        );
    }

    #[test]
    fn surface_prefers_srgb() {
        let capabilities = wgpu::SurfaceCapabilities {
            formats: vec![
                wgpu::TextureFormat::Bgra8Unorm,
                wgpu::TextureFormat::Bgra8UnormSrgb,
            ],
            present_modes: vec![PresentMode::Fifo],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        };

        let config = surface_config(
            &capabilities,
            PhysicalSize::new(0, 600),
            &RenderConfig::default(),
        )
        .unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!((config.width, config.height), (1, 600));
    }

    #[test]
    fn surface_without_formats_is_an_error() {
        let capabilities = wgpu::SurfaceCapabilities::default();
        assert!(surface_config(
            &capabilities,
            PhysicalSize::new(800, 600),
            &RenderConfig::default()
        )
        .is_err());
    }
}
