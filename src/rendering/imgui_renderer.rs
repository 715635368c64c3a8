use imgui_wgpu::RendererConfig;

/// The debug panel. It is drawn last and covers the whole window, ignoring the canvas viewport,
/// so it stays usable over the letterbox bars.
pub struct DebugPanelRenderer {
    renderer: imgui_wgpu::Renderer,
}

/// imgui-wgpu ships two fragment shaders: one writing linear colour for sRGB targets and one
/// encoding sRGB itself for plain unorm targets.
fn panel_config(surface_format: wgpu::TextureFormat) -> RendererConfig<'static> {
    let base = if surface_format.is_srgb() {
        RendererConfig::new()
    } else {
        RendererConfig::new_srgb()
    };

    RendererConfig {
        texture_format: surface_format,
        ..base
    }
}

impl DebugPanelRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        context: &mut imgui::Context,
    ) -> Self {
        log::debug!("Debug panel targets {surface_format:?}");

        Self {
            renderer: imgui_wgpu::Renderer::new(
                context,
                device,
                queue,
                panel_config(surface_format),
            ),
        }
    }

    /// Ends the imgui frame and draws it over `target`. A hidden panel produces no draw lists
    /// and skips the pass entirely.
    pub fn draw(
        &mut self,
        context: &mut imgui::Context,
        target: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
    ) -> anyhow::Result<()> {
        let draw_data = context.render();

        // imgui-rs crashes on empty draw data, https://github.com/imgui-rs/imgui-rs/issues/325
        if draw_data.draw_lists_count() == 0 {
            return Ok(());
        }

        let mut panel_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Debug panel pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.renderer
            .render(draw_data, queue, device, &mut panel_pass)
            .map_err(|e| anyhow::anyhow!("Drawing the debug panel failed: {e:?}"))
    }
}
