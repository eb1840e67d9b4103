//! Level-of-detail table of patterns spanning a density range.
//!
//! A [`PatternSet`] holds one [`Pattern`] per density level together with a
//! vertex buffer ready for upload: interleaved `[x, y, r]` triples where `r`
//! is a per-vertex random scalar in [0, 1) used downstream for visual
//! variation. The set is built once from a [`PatternSetConfig`] and is
//! read-only afterwards.
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::events::{EventSink, PatternSetEvent, PatternSetEventKind};
use crate::generator::{GenerationStats, GeneratorConfig, Pattern, PatternGenerator};
use crate::rng::{rand01, seed_for_level};

/// How target densities are spread over the levels of a set.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DensityInterpolation {
    /// Evenly spaced from `min_density` (level 0) to `max_density` (last level).
    /// A single level uses `min_density`.
    #[default]
    Linear,
    /// Level `i` draws its density uniformly from the `i`-th of `pattern_count`
    /// equal slices of `[min_density, max_density)`. Consumes one draw per level.
    Jittered,
}

impl DensityInterpolation {
    /// Target density for `level` out of `count` levels.
    pub fn density_for_level(
        &self,
        min_density: f32,
        max_density: f32,
        level: usize,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> f32 {
        let t = match self {
            DensityInterpolation::Linear => {
                if count <= 1 {
                    0.0
                } else {
                    level as f32 / (count - 1) as f32
                }
            }
            DensityInterpolation::Jittered => (level as f32 + rand01(rng)) / count.max(1) as f32,
        };
        min_density + (max_density - min_density) * t
    }
}

/// How random streams are assigned to levels.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RandomStreams {
    /// All levels draw, in order, from the RNG passed to the build. Each level's
    /// output depends on every level built before it.
    #[default]
    Shared,
    /// Every level seeds its own generator from `base_seed` and its index, so
    /// levels are independent of each other and of the RNG passed to the build.
    /// With the `parallel` feature these levels are built concurrently.
    PerLevel { base_seed: u64 },
}

/// Parameters for building a [`PatternSet`].
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PatternSetConfig {
    /// Lowest terrain level the set is used at. Passed through.
    pub min_level: u32,
    /// Highest terrain level the set is used at. Passed through.
    pub max_level: u32,
    /// Tile cache capacity for the consumer. Passed through.
    pub tile_cache_size: usize,
    /// Density of the sparsest level, in points per unit area.
    pub min_density: u32,
    /// Density of the densest level, in points per unit area.
    pub max_density: u32,
    /// Number of density levels.
    pub pattern_count: usize,
    /// Distance beyond which instances are not drawn. Passed through.
    pub max_distance: f32,
    /// Distance at which the renderer switches level of detail. Passed through.
    pub lod_distance: f32,
    /// Generator parameters shared by every level.
    pub generator: GeneratorConfig,
    /// Density policy across levels.
    pub interpolation: DensityInterpolation,
    /// Random stream policy across levels.
    pub streams: RandomStreams,
}

impl Default for PatternSetConfig {
    fn default() -> Self {
        Self {
            min_level: 0,
            max_level: 0,
            tile_cache_size: 1,
            min_density: 1,
            max_density: 1,
            pattern_count: 1,
            max_distance: 1.0,
            lod_distance: 1.0,
            generator: GeneratorConfig::default(),
            interpolation: DensityInterpolation::default(),
            streams: RandomStreams::default(),
        }
    }
}

impl PatternSetConfig {
    /// Creates a new [`PatternSetConfig`] for the given density range and level count.
    pub fn new(min_density: u32, max_density: u32, pattern_count: usize) -> Self {
        Self {
            min_density,
            max_density,
            pattern_count,
            ..Default::default()
        }
    }

    /// Sets the terrain level range.
    pub fn with_levels(mut self, min_level: u32, max_level: u32) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    /// Sets the tile cache size.
    pub fn with_tile_cache_size(mut self, tile_cache_size: usize) -> Self {
        self.tile_cache_size = tile_cache_size;
        self
    }

    /// Sets the maximum draw distance and the level-of-detail distance.
    pub fn with_distances(mut self, max_distance: f32, lod_distance: f32) -> Self {
        self.max_distance = max_distance;
        self.lod_distance = lod_distance;
        self
    }

    /// Sets the generator configuration.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the density interpolation policy.
    pub fn with_interpolation(mut self, interpolation: DensityInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the random stream policy.
    pub fn with_streams(mut self, streams: RandomStreams) -> Self {
        self.streams = streams;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.pattern_count == 0 {
            return Err(Error::InvalidConfig("pattern_count must be > 0".into()));
        }
        if self.min_density == 0 {
            return Err(Error::InvalidConfig("min_density must be > 0".into()));
        }
        if self.min_density > self.max_density {
            return Err(Error::InvalidConfig(
                "min_density must be <= max_density".into(),
            ));
        }
        if self.min_level > self.max_level {
            return Err(Error::InvalidConfig(
                "min_level must be <= max_level".into(),
            ));
        }
        if self.tile_cache_size == 0 {
            return Err(Error::InvalidConfig("tile_cache_size must be > 0".into()));
        }
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(Error::InvalidConfig(
                "max_distance must be finite and > 0".into(),
            ));
        }
        if !self.lod_distance.is_finite() || self.lod_distance <= 0.0 {
            return Err(Error::InvalidConfig(
                "lod_distance must be finite and > 0".into(),
            ));
        }
        self.generator.validate()
    }
}

/// Interleaved vertex data for one pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternBuffer {
    vertices: Vec<[f32; 3]>,
}

impl PatternBuffer {
    /// Floats per vertex: position x, position y, random scalar.
    pub const FLOATS_PER_VERTEX: usize = 3;

    /// Build a buffer for `pattern`, drawing one random scalar per vertex.
    pub fn from_pattern(pattern: &Pattern, rng: &mut dyn RngCore) -> Self {
        let vertices = pattern
            .iter()
            .map(|p| [p.x, p.y, rand01(rng)])
            .collect();
        Self { vertices }
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    /// Vertex data as one flat slice, ready for upload.
    pub fn as_interleaved(&self) -> &[f32] {
        self.vertices.as_flattened()
    }

    /// Byte stride between consecutive vertices.
    pub fn stride_bytes(&self) -> usize {
        Self::FLOATS_PER_VERTEX * std::mem::size_of::<f32>()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// One density level of a [`PatternSet`].
#[derive(Clone, Debug, PartialEq)]
pub struct PatternLevel {
    index: usize,
    density: f32,
    pattern: Pattern,
    buffer: PatternBuffer,
}

impl PatternLevel {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn buffer(&self) -> &PatternBuffer {
        &self.buffer
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len()
    }
}

/// Patterns for every density level plus the metadata consumers need.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternSet {
    levels: Vec<PatternLevel>,
    min_vertices: usize,
    max_vertices: usize,
    min_level: u32,
    max_level: u32,
    tile_cache_size: usize,
    min_density: u32,
    max_density: u32,
    max_distance: f32,
    lod_distance: f32,
}

impl PatternSet {
    /// Build every level described by `config`.
    ///
    /// With [`RandomStreams::Shared`] all draws come from `rng`: per level the
    /// density draw (if any), then the generator, then the vertex scalars.
    /// With [`RandomStreams::PerLevel`] `rng` is not used.
    pub fn build(config: &PatternSetConfig, rng: &mut dyn RngCore) -> Result<Self> {
        Self::build_with_events(config, rng, &mut ())
    }

    pub fn build_with_events(
        config: &PatternSetConfig,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Self> {
        config.validate()?;
        let generator = PatternGenerator::try_new(config.generator)?;

        info!(
            "Building {} patterns | density {}..={} | streams: {:?}.",
            config.pattern_count, config.min_density, config.max_density, config.streams
        );
        if sink.wants(PatternSetEventKind::BuildStarted) {
            sink.send(PatternSetEvent::BuildStarted {
                pattern_count: config.pattern_count,
                streams: config.streams,
            });
        }

        let built = match config.streams {
            RandomStreams::Shared => (0..config.pattern_count)
                .map(|level| build_level(&generator, config, level, rng))
                .collect::<Result<Vec<_>>>()?,
            RandomStreams::PerLevel { base_seed } => {
                build_independent_levels(&generator, config, base_seed)?
            }
        };

        let mut levels = Vec::with_capacity(built.len());
        for (level, stats) in built {
            if level.pattern.len() == 1 {
                warn!(
                    "Pattern level {} (density {:.2}) holds only the seed point.",
                    level.index, level.density
                );
                if sink.wants(PatternSetEventKind::Warning) {
                    sink.send(PatternSetEvent::Warning {
                        context: format!("level:{}", level.index),
                        message: "Pattern holds only the seed point".into(),
                    });
                }
            }
            if sink.wants(PatternSetEventKind::LevelFinished) {
                sink.send(PatternSetEvent::LevelFinished {
                    level: level.index,
                    density: level.density,
                    radius: level.pattern.radius(),
                    vertices: level.vertex_count(),
                    stats,
                });
            }
            levels.push(level);
        }

        let min_vertices = levels.iter().map(PatternLevel::vertex_count).min().unwrap_or(0);
        let max_vertices = levels.iter().map(PatternLevel::vertex_count).max().unwrap_or(0);

        info!(
            "Built {} patterns | vertices {}..={}.",
            levels.len(),
            min_vertices,
            max_vertices
        );
        if sink.wants(PatternSetEventKind::BuildFinished) {
            sink.send(PatternSetEvent::BuildFinished {
                min_vertices,
                max_vertices,
            });
        }

        Ok(Self {
            levels,
            min_vertices,
            max_vertices,
            min_level: config.min_level,
            max_level: config.max_level,
            tile_cache_size: config.tile_cache_size,
            min_density: config.min_density,
            max_density: config.max_density,
            max_distance: config.max_distance,
            lod_distance: config.lod_distance,
        })
    }

    /// Number of density levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[PatternLevel] {
        &self.levels
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternLevel> {
        self.levels.iter()
    }

    pub fn level(&self, index: usize) -> Option<&PatternLevel> {
        self.levels.get(index)
    }

    pub fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.level(index).map(PatternLevel::pattern)
    }

    pub fn buffer(&self, index: usize) -> Option<&PatternBuffer> {
        self.level(index).map(PatternLevel::buffer)
    }

    /// Smallest vertex count over all levels.
    pub fn min_vertices(&self) -> usize {
        self.min_vertices
    }

    /// Largest vertex count over all levels.
    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn min_level(&self) -> u32 {
        self.min_level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn tile_cache_size(&self) -> usize {
        self.tile_cache_size
    }

    pub fn min_density(&self) -> u32 {
        self.min_density
    }

    pub fn max_density(&self) -> u32 {
        self.max_density
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn lod_distance(&self) -> f32 {
        self.lod_distance
    }
}

fn build_level(
    generator: &PatternGenerator,
    config: &PatternSetConfig,
    index: usize,
    rng: &mut dyn RngCore,
) -> Result<(PatternLevel, GenerationStats)> {
    let density = config.interpolation.density_for_level(
        config.min_density as f32,
        config.max_density as f32,
        index,
        config.pattern_count,
        rng,
    );
    let (pattern, stats) = generator.generate_with_stats(density, rng)?;
    let buffer = PatternBuffer::from_pattern(&pattern, rng);
    Ok((
        PatternLevel {
            index,
            density,
            pattern,
            buffer,
        },
        stats,
    ))
}

fn build_seeded_level(
    generator: &PatternGenerator,
    config: &PatternSetConfig,
    base_seed: u64,
    index: usize,
) -> Result<(PatternLevel, GenerationStats)> {
    let mut rng = StdRng::seed_from_u64(seed_for_level(base_seed, index));
    build_level(generator, config, index, &mut rng)
}

#[cfg(feature = "parallel")]
fn build_independent_levels(
    generator: &PatternGenerator,
    config: &PatternSetConfig,
    base_seed: u64,
) -> Result<Vec<(PatternLevel, GenerationStats)>> {
    use rayon::prelude::*;

    (0..config.pattern_count)
        .into_par_iter()
        .map(|index| build_seeded_level(generator, config, base_seed, index))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_independent_levels(
    generator: &PatternGenerator,
    config: &PatternSetConfig,
    base_seed: u64,
) -> Result<Vec<(PatternLevel, GenerationStats)>> {
    (0..config.pattern_count)
        .map(|index| build_seeded_level(generator, config, base_seed, index))
        .collect()
}
