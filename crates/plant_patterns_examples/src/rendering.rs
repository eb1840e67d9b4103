//! PNG previews of generated patterns.
use std::path::Path;

use anyhow::Context;
use image::{Rgb, RgbImage};
use plant_patterns::prelude::{Pattern, PatternSet};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a console subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// How points are drawn.
#[derive(Debug, Clone, Copy)]
pub struct PatternStyle {
    pub color: [u8; 3],
    /// Dot radius in pixels.
    pub radius: i32,
    /// Shade each dot by the vertex's random scalar instead of a flat colour.
    pub shade_by_scalar: bool,
}

impl Default for PatternStyle {
    fn default() -> Self {
        Self {
            color: [34, 110, 48],
            radius: 2,
            shade_by_scalar: false,
        }
    }
}

/// Image settings for pattern previews.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Size in pixels of one unit tile.
    pub tile_px: u32,
    pub background: [u8; 3],
    pub style: PatternStyle,
}

impl RenderConfig {
    pub fn new(tile_px: u32) -> Self {
        Self {
            tile_px,
            background: [235, 230, 215],
            style: PatternStyle::default(),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_style(mut self, style: PatternStyle) -> Self {
        self.style = style;
        self
    }
}

/// Render one pattern into a square PNG.
pub fn render_pattern_to_png(
    pattern: &Pattern,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut img = RgbImage::from_pixel(config.tile_px, config.tile_px, Rgb(config.background));
    for p in pattern.iter() {
        let dot = Dot {
            x: p.x,
            y: p.y,
            color: config.style.color,
        };
        draw_dot(&mut img, 0, dot, config);
    }
    save(&img, path.as_ref())
}

/// Render every level of a set side by side, left to right.
pub fn render_pattern_set_to_png(
    set: &PatternSet,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let levels = set.len().max(1) as u32;
    let mut img = RgbImage::from_pixel(
        config.tile_px * levels,
        config.tile_px,
        Rgb(config.background),
    );

    for (i, level) in set.iter().enumerate() {
        let offset = i as u32 * config.tile_px;
        for vertex in level.buffer().vertices() {
            let color = if config.style.shade_by_scalar {
                shade(config.style.color, vertex[2])
            } else {
                config.style.color
            };
            let dot = Dot {
                x: vertex[0],
                y: vertex[1],
                color,
            };
            draw_dot(&mut img, offset, dot, config);
        }
    }
    save(&img, path.as_ref())
}

struct Dot {
    x: f32,
    y: f32,
    color: [u8; 3],
}

fn shade(color: [u8; 3], scalar: f32) -> [u8; 3] {
    let k = 0.5 + 0.5 * scalar.clamp(0.0, 1.0);
    color.map(|c| (c as f32 * k).round() as u8)
}

fn draw_dot(img: &mut RgbImage, x_offset: u32, dot: Dot, config: &RenderConfig) {
    let tile_px = config.tile_px as i32;
    let radius = config.style.radius;
    let cx = x_offset as i32 + (dot.x * tile_px as f32) as i32;
    // Flip Y so the tile origin sits at the bottom-left.
    let cy = tile_px - 1 - (dot.y * tile_px as f32) as i32;
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let px = cx + dx;
            let py = cy + dy;
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, Rgb(dot.color));
            }
        }
    }
}

fn save(img: &RgbImage, path: &Path) -> anyhow::Result<()> {
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {}.", path.display());
    Ok(())
}
