use std::sync::Arc;

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::CameraUniform,
    demo::DemoState,
    rendering::{
        batches::FrameBatches,
        config::RenderConfig,
        global_uniform::GlobalUniformState,
        imgui_renderer::DebugPanelRenderer,
        instance::InstanceBuffer,
        lights::LightUniform,
        passes::{
            background_pass::{BackgroundPass, BackgroundPassTextureViews},
            line_pass::LinePass,
            mesh_pass::{MeshPass, MeshPassTextureViews},
            pass::Pass,
        },
        render_common::{self, RenderCommon},
        render_resources::SceneResources,
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::DepthTexture,
    },
    viewport::Viewport,
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: RenderCommon,
    depth_texture: DepthTexture,
    camera_uniform: CameraUniform,
    instance_buffer: InstanceBuffer,
    resources: SceneResources,
    scene_generation: u64,

    shader_loader: ShaderLoader,
    debug_panel: DebugPanelRenderer,

    background_pass: BackgroundPass,
    mesh_pass: MeshPass,
    line_pass: LinePass,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        config: &RenderConfig,
        imgui: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;

        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let surface_config =
            render_common::surface_config(&surface.get_capabilities(&adapter), size, config)?;
        surface.configure(&device, &surface_config);
        log::debug!(
            "Surface format {:?}, present mode {:?}",
            surface_config.format,
            surface_config.present_mode
        );

        let common = RenderCommon::new(&device, surface_config.format);
        let depth_texture = DepthTexture::new(&device, size, "Depth Texture");

        let mut cache_builder = PipelineCacheBuilder::new();

        let background_pass = BackgroundPass::create(&device, &common, &mut cache_builder)?;
        let mesh_pass = MeshPass::create(&device, &common, &mut cache_builder)?;
        let line_pass = LinePass::create(&device, &common, &mut cache_builder)?;

        let shader_loader =
            ShaderLoader::new(device.clone(), cache_builder, config.hot_reload_shaders)?;

        let debug_panel = DebugPanelRenderer::new(&device, &queue, surface_config.format, imgui);

        let instance_buffer = InstanceBuffer::new(&device);
        let resources = SceneResources::new(&device, &queue);

        Ok(Self {
            window,
            size,
            surface,
            surface_config,
            device,
            queue,
            common,
            depth_texture,
            camera_uniform: CameraUniform::default(),
            instance_buffer,
            resources,
            scene_generation: 0,
            shader_loader,
            debug_panel,
            background_pass,
            mesh_pass,
            line_pass,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            self.depth_texture.resize(&self.device, new_size);
        }
    }

    pub fn render(
        &mut self,
        demo_state: &DemoState,
        viewport: Viewport,
        imgui: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        // Ids from a previous scene may be reused by the new one
        if demo_state.generation() != self.scene_generation {
            self.resources.clear();
            self.scene_generation = demo_state.generation();
        }

        let context = &demo_state.context;
        let scene = &context.scene;

        self.camera_uniform.update(&context.camera);
        self.camera_uniform
            .update_buffer(&self.queue, &self.common.camera_uniform_buffer);
        self.common
            .update_lights(&self.queue, &LightUniform::from_scene(scene));
        self.common.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(scene.background),
        );

        let batches = FrameBatches::gather(scene);
        self.resources
            .prepare(&self.device, &self.queue, &self.common, scene, &batches);
        self.instance_buffer
            .write(&self.device, &self.queue, &batches.instances);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                // The imgui frame still has to be closed before the next one starts
                imgui.render();
                return Err(e);
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let pipeline_cache = &self.shader_loader.cache;

        // The canvas is computed from the same window size, but skip it rather than hand wgpu
        // an out-of-bounds scissor
        let draw_canvas = !viewport.is_empty()
            && viewport.x + viewport.width <= self.surface_config.width
            && viewport.y + viewport.height <= self.surface_config.height;
        let viewport = if draw_canvas {
            viewport
        } else {
            Viewport {
                x: 0,
                y: 0,
                width: self.surface_config.width,
                height: self.surface_config.height,
            }
        };

        self.background_pass.render(
            &BackgroundPassTextureViews {
                color: view.clone(),
            },
            &viewport,
            &mut encoder,
            pipeline_cache,
            |render_pass| {
                if draw_canvas {
                    render_pass.draw(0..3, 0..1);
                }
            },
        );

        if draw_canvas {
            let scene_views = MeshPassTextureViews {
                color: view.clone(),
                depth: self.depth_texture.view().clone(),
            };

            let resources = &self.resources;
            let instance_buffer = &self.instance_buffer;

            self.mesh_pass.render(
                &scene_views,
                &viewport,
                &mut encoder,
                pipeline_cache,
                |render_pass| {
                    instance_buffer.bind(render_pass);

                    for batch in &batches.meshes {
                        let (Some(geometry), Some(material)) = (
                            resources.geometries.get(&batch.geometry),
                            resources.materials.get(&batch.material),
                        ) else {
                            continue;
                        };

                        render_pass.set_bind_group(1, &material.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                        render_pass.set_index_buffer(
                            geometry.index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        render_pass.draw_indexed(
                            0..geometry.num_indices,
                            0,
                            batch.instances.clone(),
                        );
                    }
                },
            );

            self.line_pass.render(
                &scene_views,
                &viewport,
                &mut encoder,
                pipeline_cache,
                |render_pass| {
                    instance_buffer.bind(render_pass);

                    for batch in &batches.lines {
                        let Some(lines) = resources.lines.get(&batch.line_set) else {
                            continue;
                        };

                        render_pass.set_vertex_buffer(0, lines.vertex_buffer.slice(..));
                        render_pass.draw(0..lines.num_vertices, batch.instances.clone());
                    }
                },
            );
        }

        if let Err(e) =
            self.debug_panel
                .draw(imgui, &view, &self.device, &self.queue, &mut encoder)
        {
            log::error!("{e:?}");
        }

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
