use anyhow::Result;
use clap::Parser;

mod camera;
mod color;
mod config;
mod controls;
mod demo;
mod engine;
mod input;
mod rendering;
mod scene_graph;
mod scenes;
mod viewport;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("scenery", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = config::Args::parse();

    if args.list_scenes {
        for (i, entry) in scenes::SCENES.iter().enumerate() {
            println!("{}  {:<20} {}", i + 1, entry.name, entry.title);
        }
        return Ok(());
    }

    let config = config::AppConfig::from_args(&args)?;

    pollster::block_on(window::run(config))?;

    Ok(())
}
