use wgpu::{
    DepthBiasState, Device, MultisampleState, PipelineCompilationOptions, RenderPass,
    RenderPassDescriptor, ShaderSource, StencilState,
};

use crate::{
    rendering::{
        instance::InstanceData,
        passes::pass::{set_viewport, Pass},
        render_common::RenderCommon,
        render_geometry::GEOMETRY_VBL,
        shader_loader::{PipelineCache, PipelineCacheBuilder, PipelineId, ShaderDefinition},
        texture::DepthTexture,
    },
    viewport::Viewport,
};

/// Forward pass over instanced mesh batches. Basic and Lambert materials share one pipeline;
/// the material uniform selects lighting.
pub struct MeshPass {
    pipeline_id: PipelineId,
    scene_bind_group: wgpu::BindGroup,
}

pub struct MeshPassTextureViews {
    pub color: wgpu::TextureView,
    pub depth: wgpu::TextureView,
}

const MESH_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Mesh",
    path: "mesh.wgsl",
};

pub const MESH_PRIMITIVE_STATE: wgpu::PrimitiveState = wgpu::PrimitiveState {
    topology: wgpu::PrimitiveTopology::TriangleList,
    strip_index_format: None,
    front_face: wgpu::FrontFace::Ccw,
    cull_mode: Some(wgpu::Face::Back),
    polygon_mode: wgpu::PolygonMode::Fill,
    unclipped_depth: false,
    conservative: false,
};

impl Pass for MeshPass {
    type TextureViews = MeshPassTextureViews;

    fn create(
        device: &Device,
        common: &RenderCommon,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<Self> {
        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Mesh render pipeline layout"),
                bind_group_layouts: &[
                    &common.scene_bind_group_layout,
                    &common.material_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });

        let format = common.surface_format;

        let pipeline_id = cache_builder.add_shader(
            MESH_SHADER,
            Box::new(
                move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(shader_def.name),
                        source: ShaderSource::Wgsl(source.into()),
                    });

                    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Mesh render pipeline"),
                        layout: Some(&render_pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[GEOMETRY_VBL, InstanceData::descriptor()],
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
                        primitive: MESH_PRIMITIVE_STATE,
                        depth_stencil: Some(wgpu::DepthStencilState {
                            format: DepthTexture::DEPTH_FORMAT,
                            depth_write_enabled: true,
                            depth_compare: wgpu::CompareFunction::Less,
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

        Ok(MeshPass {
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
            label: Some("Mesh Pass"),
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
                    load: wgpu::LoadOp::Clear(1.0),
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
