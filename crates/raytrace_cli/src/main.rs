//! Render the reference scene to a PNG.
//!
//! Usage: `raytrace [config.json] [output.png]`
//!
//! The config file is optional JSON; missing fields take their defaults.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use raytrace_renderer::{build_scene, render, CancelToken, ImageBuffer, RenderConfig};

const DEFAULT_OUTPUT: &str = "images/image.png";

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        log::info!("No config file given, using defaults");
        return Ok(RenderConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let png = image::RgbImage::from_raw(image.width, image.height, image.to_rgb_bytes())
        .context("Image buffer size does not match its dimensions")?;
    png.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let output = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

    let config = load_config(config_path.as_deref())?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = Instant::now();
    let scene = build_scene(&config, &mut rng)?;
    log::info!("Scene built in {:?}", start.elapsed());

    let image = render(&scene, &config, &CancelToken::new())?;

    save_png(&image, &output)?;
    log::info!("Saved to {}", output.display());

    Ok(())
}
