//! Render configuration and the parallel pixel loop.
//!
//! Every pixel is an independent unit of work: the scene is shared by
//! reference and each pixel gets its own generator, seeded from the render
//! seed and the pixel index, so a fixed seed reproduces the same image no
//! matter how rayon schedules the work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{RenderError, RenderResult, Scene};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov_degrees: f64,
    /// Lens radius; 0 is a pinhole camera
    pub aperture: f64,
    /// Intersect through a BVH instead of a flat list
    pub use_bvh: bool,
    /// Seed for scene generation and sampling; random when unset
    pub seed: Option<u64>,
    /// Apply the metal fuzz parameter instead of rendering perfect mirrors
    pub metal_fuzz: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 675,
            samples_per_pixel: 100,
            max_depth: 10,
            vfov_degrees: 30.0,
            aperture: 0.0,
            use_bvh: true,
            seed: None,
            metal_fuzz: false,
        }
    }
}

impl RenderConfig {
    /// Check that every knob is in range.
    pub fn validate(&self) -> RenderResult<()> {
        let invalid = |msg: String| Err(RenderError::InvalidConfig(msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples_per_pixel must be positive".to_string());
        }
        if self.max_depth == 0 {
            return invalid("max_depth must be positive".to_string());
        }
        if self.vfov_degrees.is_nan() || self.vfov_degrees <= 0.0 || self.vfov_degrees >= 180.0 {
            return invalid(format!(
                "vfov_degrees must be in (0, 180), got {}",
                self.vfov_degrees
            ));
        }
        if self.aperture.is_nan() || self.aperture < 0.0 {
            return invalid(format!("aperture must be non-negative, got {}", self.aperture));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Cooperative cancellation flag, checked between pixel tasks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 8-bit RGB image stored top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    /// Image row holding scene row `y` (scene rows count up from the bottom).
    pub fn row_of(&self, y: u32) -> u32 {
        self.height - y - 1
    }

    /// Get the pixel at column `x`, image row `row`.
    pub fn get(&self, x: u32, row: u32) -> [u8; 3] {
        self.pixels[self.index(x, row)]
    }

    /// Set the pixel at column `x`, image row `row`.
    pub fn set(&mut self, x: u32, row: u32, rgb: [u8; 3]) {
        let index = self.index(x, row);
        self.pixels[index] = rgb;
    }

    /// Flattened RGB bytes, ready for an encoder.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    fn index(&self, x: u32, row: u32) -> usize {
        row as usize * self.width as usize + x as usize
    }
}

/// Render a single pixel with multi-sampling. `y = 0` is the bottom row.
pub fn render_pixel(
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> [u8; 3] {
    scene.color(
        x,
        y,
        config.samples_per_pixel,
        config.max_depth,
        config.width,
        config.height,
        rng,
    )
}

/// Seed of the generator for one pixel. Never equal to `seed` itself, which
/// also seeds scene generation.
fn pixel_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render the entire scene in parallel.
///
/// Returns [`RenderError::Cancelled`] if `cancel` fires before every pixel
/// has been started.
pub fn render(
    scene: &Scene,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let (width, height) = (config.width, config.height);

    log::info!(
        "Rendering {}x{} @ {} spp, depth {} (seed {})",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        seed
    );
    let start = Instant::now();

    // Indices run over image rows top-down, so the result is already flipped.
    let pixels = (0..config.pixel_count())
        .into_par_iter()
        .map(|index| {
            if cancel.is_cancelled() {
                return Err(RenderError::Cancelled);
            }
            let x = (index % width as usize) as u32;
            let row = (index / width as usize) as u32;
            let y = height - row - 1;

            let mut rng = StdRng::seed_from_u64(pixel_seed(seed, index));
            Ok(render_pixel(scene, x, y, config, &mut rng))
        })
        .collect::<RenderResult<Vec<_>>>();

    let pixels = match pixels {
        Ok(pixels) => pixels,
        Err(err) => {
            log::warn!("Render stopped after {:?}: {}", start.elapsed(), err);
            return Err(err);
        }
    };

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(ImageBuffer {
        width,
        height,
        pixels,
    })
}
