use wgpu::RenderPass;

use crate::{
    rendering::{
        render_common::RenderCommon,
        shader_loader::{PipelineCache, PipelineCacheBuilder},
    },
    viewport::Viewport,
};

pub(crate) trait Pass {
    type TextureViews;

    fn create(
        device: &wgpu::Device,
        common: &RenderCommon,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Begins the pass restricted to the canvas viewport, binds the pipeline and scene
    /// uniforms, and lets the callback issue draws.
    fn render<'a, F>(
        &self,
        texture_views: &Self::TextureViews,
        viewport: &Viewport,
        encoder: &mut wgpu::CommandEncoder,
        pipeline_cache: &PipelineCache,
        render_callback: F,
    ) where
        F: FnOnce(&mut RenderPass) + 'a;
}

pub(crate) fn set_viewport(render_pass: &mut RenderPass, viewport: &Viewport) {
    render_pass.set_viewport(
        viewport.x as f32,
        viewport.y as f32,
        viewport.width as f32,
        viewport.height as f32,
        0.0,
        1.0,
    );
    render_pass.set_scissor_rect(viewport.x, viewport.y, viewport.width, viewport.height);
}
