pub mod batches;
pub mod config;
pub mod global_uniform;
pub mod imgui_renderer;
pub mod instance;
pub mod lights;
pub mod passes;
pub mod render_common;
pub mod render_geometry;
pub mod render_material;
pub mod render_resources;
pub mod renderer;
pub mod shader_loader;
pub mod texture;
