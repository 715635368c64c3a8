use wgpu::{Device, RenderPass};

use crate::{
    rendering::{
        passes::pass::{set_viewport, Pass},
        render_common::RenderCommon,
        shader_loader::{PipelineCache, PipelineCacheBuilder, PipelineId, ShaderDefinition},
    },
    viewport::Viewport,
};

/// Clears the whole window to black, then paints the canvas viewport with the scene's
/// background colour. Everything outside the viewport stays black as letterboxing.
pub struct BackgroundPass {
    pipeline_id: PipelineId,
    scene_bind_group: wgpu::BindGroup,
}

const CANVAS_BACKGROUND_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Canvas background",
    path: "fullscreen_quad.wgsl",
};

pub struct BackgroundPassTextureViews {
    pub color: wgpu::TextureView,
}

/// A single vertex-less triangle, clipped to the canvas by the viewport and scissor.
fn canvas_fill_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Canvas background pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(format.into())],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl Pass for BackgroundPass {
    type TextureViews = BackgroundPassTextureViews;

    fn create(
        device: &Device,
        common: &RenderCommon,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<BackgroundPass> {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Canvas background layout"),
            bind_group_layouts: &[&common.scene_bind_group_layout],
            push_constant_ranges: &[],
        });
        let format = common.surface_format;

        let pipeline_id = cache_builder.add_shader(
            CANVAS_BACKGROUND_SHADER,
            Box::new(move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(shader_def.name),
                    source: wgpu::ShaderSource::Wgsl(source.into()),
                });

                Ok(canvas_fill_pipeline(device, &layout, format, &shader))
            }),
        );

        Ok(Self {
            pipeline_id,
            scene_bind_group: common.scene_bind_group.clone(),
        })
    }

    fn render<'a, F>(
        &self,
        texture_views: &Self::TextureViews,
        viewport: &Viewport,
        encoder: &mut wgpu::CommandEncoder,
        pipeline_cache: &PipelineCache,
        render_callback: F,
    ) where
        F: FnOnce(&mut RenderPass) + 'a,
    {
        // The clear covers the letterbox bars, the draw only the canvas
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Canvas background pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            ..Default::default()
        });

        // The shader failed to compile: the window stays black
        let Some(pipeline) = pipeline_cache.get(self.pipeline_id) else {
            return;
        };

        set_viewport(&mut render_pass, viewport);
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_callback(&mut render_pass);
    }
}
