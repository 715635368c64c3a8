use wgpu::{
    DepthBiasState, Device, MultisampleState, PipelineCompilationOptions, RenderPass,
    RenderPassDescriptor, ShaderSource, StencilState,
};

use crate::{
    rendering::{
        instance::InstanceData,
        passes::{
            mesh_pass::MeshPassTextureViews,
            pass::{set_viewport, Pass},
        },
        render_common::RenderCommon,
        render_geometry::LINE_VBL,
        shader_loader::{PipelineCache, PipelineCacheBuilder, PipelineId, ShaderDefinition},
        texture::DepthTexture,
    },
    viewport::Viewport,
};

/// Unlit helper lines, depth tested against the meshes drawn before them.
pub struct LinePass {
    pipeline_id: PipelineId,
    scene_bind_group: wgpu::BindGroup,
}

const LINE_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Lines",
    path: "lines.wgsl",
};

impl Pass for LinePass {
    type TextureViews = MeshPassTextureViews;

    fn create(
        device: &Device,
        common: &RenderCommon,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<Self> {
        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Line render pipeline layout"),
                bind_group_layouts: &[&common.scene_bind_group_layout],
                push_constant_ranges: &[],
            });

        let format = common.surface_format;

        let pipeline_id = cache_builder.add_shader(
            LINE_SHADER,
            Box::new(
                move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(shader_def.name),
                        source: ShaderSource::Wgsl(source.into()),
                    });

                    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Line render pipeline"),
                        layout: Some(&render_pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[LINE_VBL, InstanceData::descriptor()],
                            compilation_options: PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: Some("fs_main"),
                            targets: &[Some(wgpu::ColorTargetState {
                                format,
                                blend: Some(wgpu::BlendState::REPLACE),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                            compilation_options: PipelineCompilationOptions::default(),
                        }),
                        primitive: wgpu::PrimitiveState {
                            topology: wgpu::PrimitiveTopology::LineList,
                            ..Default::default()
                        },
                        depth_stencil: Some(wgpu::DepthStencilState {
                            format: DepthTexture::DEPTH_FORMAT,
                            depth_write_enabled: true,
                            depth_compare: wgpu::CompareFunction::LessEqual,
                            stencil: StencilState::default(),
                            bias: DepthBiasState::default(),
                        }),
                        multisample: MultisampleState::default(),
                        multiview: None,
                        cache: None,
                    });

                    Ok(pipeline)
                },
            ),
        );

        Ok(LinePass {
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
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Line Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let Some(pipeline) = pipeline_cache.get(self.pipeline_id) else {
            return;
        };

        set_viewport(&mut render_pass, viewport);
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_callback(&mut render_pass);
    }
}
