use clap::Parser;

use crate::{
    rendering::config::RenderConfig,
    scenes::{self, SceneEntry},
    viewport::CanvasBounds,
};

#[derive(Parser, Debug)]
#[command(name = "scenery", about = "Small interactive 3D demo scenes")]
pub struct Args {
    /// Scene to start with
    #[arg(long, default_value = "transform-objects")]
    pub scene: String,

    /// Print the available scenes and exit
    #[arg(long)]
    pub list_scenes: bool,

    /// Largest canvas width, in logical pixels
    #[arg(long, default_value_t = 800.0)]
    pub max_width: f64,

    /// Largest canvas height, in logical pixels
    #[arg(long, default_value_t = 600.0)]
    pub max_height: f64,

    /// Start in borderless fullscreen
    #[arg(long)]
    pub fullscreen: bool,

    /// Don't watch the shader folder for changes
    #[arg(long)]
    pub no_hot_reload: bool,

    /// Start with the debug panel hidden (H toggles it)
    #[arg(long)]
    pub no_debug_panel: bool,

    /// Present without waiting for vertical sync, when the surface supports it
    #[arg(long)]
    pub no_vsync: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scene: &'static SceneEntry,
    pub canvas: CanvasBounds,
    pub fullscreen: bool,
    pub show_debug_panel: bool,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let scene = scenes::find(&args.scene).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown scene '{}', expected one of: {}",
                args.scene,
                scenes::names().join(", ")
            )
        })?;

        if !(args.max_width > 0.0 && args.max_height > 0.0) {
            anyhow::bail!(
                "Canvas bounds must be positive, got {}x{}",
                args.max_width,
                args.max_height
            );
        }

        Ok(Self {
            scene,
            canvas: CanvasBounds {
                max_width: args.max_width,
                max_height: args.max_height,
            },
            fullscreen: args.fullscreen,
            show_debug_panel: !args.no_debug_panel,
            render: RenderConfig {
                vsync: !args.no_vsync,
                hot_reload_shaders: !args.no_hot_reload,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<AppConfig> {
        let args = Args::try_parse_from(std::iter::once("scenery").chain(args.iter().copied()))?;
        AppConfig::from_args(&args)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.scene.name, "transform-objects");
        assert_eq!(config.canvas, CanvasBounds::default());
        assert!(config.show_debug_panel);
        assert!(!config.fullscreen);
        assert!(config.render.vsync);
        assert!(config.render.hot_reload_shaders);
    }

    #[test]
    fn flags() {
        let config = parse(&[
            "--scene",
            "lights",
            "--max-width",
            "1024",
            "--fullscreen",
            "--no-debug-panel",
            "--no-hot-reload",
            "--no-vsync",
        ])
        .unwrap();

        assert_eq!(config.scene.name, "lights");
        assert_eq!(config.canvas.max_width, 1024.0);
        assert_eq!(config.canvas.max_height, 600.0);
        assert!(config.fullscreen);
        assert!(!config.show_debug_panel);
        assert!(!config.render.hot_reload_shaders);
        assert!(!config.render.vsync);
    }

    #[test]
    fn unknown_scene_lists_valid_names() {
        let error = parse(&["--scene", "nope"]).unwrap_err().to_string();
        assert!(error.contains("nope"));
        assert!(error.contains("transform-objects"));
        assert!(error.contains("lights"));
    }

    #[test]
    fn rejects_empty_canvas() {
        assert!(parse(&["--max-height", "0"]).is_err());
    }
}
