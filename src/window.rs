use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use crate::{
    config::AppConfig,
    demo::DemoState,
    engine,
    input::{self, DragButton, PointerState},
    rendering::renderer::Renderer,
    viewport::Viewport,
};

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    config: AppConfig,
    renderer: Option<Renderer>,
    demo_state: DemoState,
    pointer: PointerState,
    imgui: Option<ImguiState>,
    viewport: Viewport,
    last_frame: Instant,
    titled_generation: Option<u64>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig, demo_state: DemoState) -> Self {
        Self {
            config,
            renderer: None,
            demo_state,
            pointer: PointerState::default(),
            imgui: None,
            viewport: Viewport::default(),
            last_frame: Instant::now(),
            titled_generation: None,
            error: None,
        }
    }

    fn setup_imgui(&mut self, window: &Window) {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        self.imgui = Some(ImguiState { context, platform });
    }

    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let canvas = self.config.canvas;
        let window_attributes = Window::default_attributes()
            .with_title("scenery")
            .with_inner_size(LogicalSize::new(canvas.max_width, canvas.max_height))
            .with_fullscreen(
                self.config
                    .fullscreen
                    .then_some(Fullscreen::Borderless(None)),
            );

        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;
        self.setup_imgui(&window);

        let imgui = self
            .imgui
            .as_mut()
            .context("Imgui was not initialised")?;
        let renderer = pollster::block_on(Renderer::new(
            Arc::new(window),
            &self.config.render,
            &mut imgui.context,
        ))
        .context("Failed to create renderer")?;

        renderer.window.request_redraw();
        self.renderer = Some(renderer);
        self.update_viewport();

        Ok(())
    }

    fn update_viewport(&mut self) {
        let Some(renderer) = self.renderer.as_ref() else {
            return;
        };

        let window = &renderer.window;
        self.viewport = Viewport::fit(
            window.inner_size(),
            window.scale_factor(),
            self.config.canvas,
        );
        log::debug!("Canvas viewport {:?}", self.viewport);
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }

        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };

        let window = self.renderer.as_ref().map(|renderer| renderer.window.as_ref());

        let result = match code {
            KeyCode::KeyF => {
                if let Some(window) = window {
                    toggle_fullscreen(window);
                }
                Ok(())
            }
            KeyCode::Escape => {
                if let Some(window) = window.filter(|window| window.fullscreen().is_some()) {
                    window.set_fullscreen(None);
                }
                Ok(())
            }
            KeyCode::KeyH => {
                self.demo_state.show_debug_panel = !self.demo_state.show_debug_panel;
                Ok(())
            }
            KeyCode::Tab => self.demo_state.switch_to_next(),
            code => match input::scene_shortcut(code) {
                Some(index) => self.demo_state.switch_to_index(index),
                None => Ok(()),
            },
        };

        if let Err(e) = result {
            log::error!("{e:?}");
        }
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        match (state, button) {
            (ElementState::Pressed, MouseButton::Left) => {
                if self
                    .pointer
                    .double_click
                    .press(Instant::now(), self.pointer.position)
                {
                    if let Some(renderer) = self.renderer.as_ref() {
                        toggle_fullscreen(&renderer.window);
                    }
                }
                self.pointer.drag = Some(DragButton::Rotate);
            }
            (ElementState::Pressed, MouseButton::Right | MouseButton::Middle) => {
                self.pointer.drag = Some(DragButton::Pan);
            }
            (ElementState::Released, _) => {
                self.pointer.drag = None;
            }
            _ => {}
        }
    }

    fn handle_cursor_moved(&mut self, position: Vec2, captured: bool) {
        let delta = self.pointer.move_to(position, &self.viewport);

        if captured {
            return;
        }

        let context = &mut self.demo_state.context;
        let (Some(drag), Some(controls)) = (self.pointer.drag, context.controls.as_mut()) else {
            return;
        };

        let height = self.viewport.height as f32;
        match drag {
            DragButton::Rotate => controls.rotate(delta.x, delta.y, height),
            DragButton::Pan => controls.pan(delta.x, delta.y, height, &context.camera),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        let now = Instant::now();
        imgui
            .context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        renderer.window.request_redraw();

        // Minimised
        if self.viewport.is_empty() {
            return;
        }

        if let Err(e) = imgui
            .platform
            .prepare_frame(imgui.context.io_mut(), &renderer.window)
        {
            log::error!("Failed to prepare Imgui frame: {e}");
            return;
        }

        self.demo_state
            .context
            .camera
            .set_aspect(self.viewport.aspect());
        let frame = self.demo_state.frame_input(self.pointer.cursor);

        let ui = imgui.context.new_frame();

        if let Err(e) = engine::update(&mut self.demo_state, &frame, ui) {
            log::error!("Error during engine::update: {e:?}");
        }

        imgui.platform.prepare_render(ui, &renderer.window);

        if self.titled_generation != Some(self.demo_state.generation()) {
            renderer
                .window
                .set_title(&format!("scenery - {}", self.demo_state.entry.title));
            self.titled_generation = Some(self.demo_state.generation());
        }

        match renderer.render(&self.demo_state, self.viewport, &mut imgui.context) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory");
                self.error = Some(anyhow::anyhow!("GPU out of memory"));
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timeout");
            }
            Err(other) => {
                log::error!("Unexpected error: {:?}", other);
            }
        }
    }
}

fn toggle_fullscreen(window: &Window) {
    if window.fullscreen().is_some() {
        window.set_fullscreen(None);
    } else {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(e) = self.create_renderer(event_loop) {
            log::error!("{e:?}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let (capture_mouse, capture_keyboard) = match (self.imgui.as_mut(), self.renderer.as_ref()) {
            (Some(imgui), Some(renderer)) => {
                imgui.platform.handle_event::<()>(
                    imgui.context.io_mut(),
                    &renderer.window,
                    &Event::WindowEvent {
                        window_id,
                        event: event.clone(),
                    },
                );

                let io = imgui.context.io();
                (io.want_capture_mouse, io.want_capture_keyboard)
            }
            _ => (false, false),
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(new_size);
                }
                self.update_viewport();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                self.update_viewport();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_moved(
                    Vec2::new(position.x as f32, position.y as f32),
                    capture_mouse,
                );
            }
            WindowEvent::MouseInput { state, button, .. } => {
                // Releases always end a drag, even over the panel
                if !capture_mouse || state == ElementState::Released {
                    self.handle_mouse_button(state, button);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let (false, Some(controls)) =
                    (capture_mouse, self.demo_state.context.controls.as_mut())
                {
                    controls.dolly(input::wheel_notches(delta));
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !capture_keyboard {
                    self.handle_key(&event);
                }
            }
            _ => (),
        }
    }
}

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;

    let mut demo_state = DemoState::new(config.scene).context("Failed to create demo state")?;
    demo_state.show_debug_panel = config.show_debug_panel;
    log::info!("Starting with scene {}", config.scene.title);

    let mut app = App::new(config, demo_state);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
