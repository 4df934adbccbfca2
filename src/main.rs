use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sprite_test::{config::DemoConfig, demo::SpriteDemo};

/// Sprite sheet animation test
#[derive(Parser)]
#[command(version, about = "Animated sprite demo. Arrows move, A attacks, I idles, Esc quits.")]
struct Cli {
    /// JSON file overriding the window and animation settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory the sprite sheets are loaded from
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DemoConfig::from_path(path)?,
        None => DemoConfig::default(),
    };
    let mut app = config.app();
    if let Some(assets) = cli.assets {
        app = app.asset_root(assets);
    }
    log::info!("Loading assets from {}", app.asset_root.display());
    app.run(|eng| eng.set_scene(SpriteDemo::new(config)))
}
