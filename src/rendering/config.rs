#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub vsync: bool,
    pub hot_reload_shaders: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            hot_reload_shaders: true,
        }
    }
}
