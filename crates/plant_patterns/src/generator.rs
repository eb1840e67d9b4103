//! Frontier-propagation dart throwing.
//!
//! Starting from the tile centre, every accepted point is popped once from a
//! frontier. Directions blocked by neighbours closer than four radii are carved
//! out of a [`RangeSet`]; offspring are then spawned at exactly two radii in
//! the remaining directions until none are left. Candidates that land outside
//! the unit tile are discarded, so patterns are not seamless across tiles.
use std::f32::consts::{FRAC_PI_3, PI, TAU};

use glam::Vec2;
use rand::RngCore;
use tracing::debug;

use crate::angular::RangeSet;
use crate::error::{Error, Result};
use crate::grid::{GridConfig, SpatialGrid};
use crate::rng::rand_index;

/// Default relation between density and exclusion radius.
pub const DEFAULT_POISSON_COVERAGE: f32 = 0.6826;

/// Position of the first point of every pattern.
pub const SEED_POINT: Vec2 = Vec2::new(0.5, 0.5);

/// Smallest offspring half-separation that still keeps siblings two radii apart.
pub const MIN_OFFSPRING_SEPARATION: f32 = FRAC_PI_3;

/// Exclusion radius for a target density: `1 / sqrt(density * π / coverage)`.
pub fn exclusion_radius(density: f32, coverage: f32) -> Result<f32> {
    if !density.is_finite() || density <= 0.0 {
        return Err(Error::InvalidDensity { density });
    }
    if !coverage.is_finite() || coverage <= 0.0 {
        return Err(Error::InvalidConfig(
            "coverage must be finite and > 0".into(),
        ));
    }
    Ok(1.0 / (density * PI / coverage).sqrt())
}

/// Tuning parameters for [`PatternGenerator`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Packing constant relating density to exclusion radius.
    pub coverage: f32,
    /// Spatial grid sizing.
    pub grid: GridConfig,
    /// Half-width of the arc removed around each spawned direction, in radians.
    pub offspring_separation: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            coverage: DEFAULT_POISSON_COVERAGE,
            grid: GridConfig::default(),
            offspring_separation: MIN_OFFSPRING_SEPARATION,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the coverage constant.
    pub fn with_coverage(mut self, coverage: f32) -> Self {
        self.coverage = coverage;
        self
    }

    /// Sets the grid configuration.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the offspring half-separation.
    pub fn with_offspring_separation(mut self, offspring_separation: f32) -> Self {
        self.offspring_separation = offspring_separation;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.coverage.is_finite() || self.coverage <= 0.0 {
            return Err(Error::InvalidConfig(
                "coverage must be finite and > 0".into(),
            ));
        }
        if !(MIN_OFFSPRING_SEPARATION..=PI).contains(&self.offspring_separation) {
            return Err(Error::InvalidConfig(
                "offspring_separation must lie in [π/3, π]".into(),
            ));
        }
        self.grid.validate()
    }
}

/// An immutable point set generated for one target density.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    points: Vec<Vec2>,
    radius: f32,
    density: f32,
    coverage: f32,
}

impl Pattern {
    /// Accepted points in discovery order.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Exclusion radius used during generation.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Guaranteed minimum distance between any two points.
    pub fn min_spacing(&self) -> f32 {
        2.0 * self.radius
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn coverage(&self) -> f32 {
        self.coverage
    }

    pub fn into_points(self) -> Vec<Vec2> {
        self.points
    }
}

/// Counters collected during one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Offspring accepted into the pattern (the seed point is not counted).
    pub accepted: usize,
    /// Offspring discarded because they fell outside the tile.
    pub discarded: usize,
    /// Points popped from the frontier.
    pub frontier_pops: usize,
}

/// Generates maximal point packings inside the unit tile.
#[derive(Clone, Debug, Default)]
pub struct PatternGenerator {
    config: GeneratorConfig,
}

impl PatternGenerator {
    pub fn try_new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn new(config: GeneratorConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid generator config");
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one pattern for `density` points per unit area.
    pub fn generate(&self, density: f32, rng: &mut dyn RngCore) -> Result<Pattern> {
        self.generate_with_stats(density, rng).map(|(pattern, _)| pattern)
    }

    /// Generate one pattern and report generation counters.
    ///
    /// Draw order: one draw picks the frontier point, then every spawned
    /// direction takes one draw for the interval and one for the angle.
    pub fn generate_with_stats(
        &self,
        density: f32,
        rng: &mut dyn RngCore,
    ) -> Result<(Pattern, GenerationStats)> {
        let radius = exclusion_radius(density, self.config.coverage)?;
        self.config.validate()?;

        let spacing = 2.0 * radius;
        let reach = 2.0 * spacing;
        let separation = self.config.offspring_separation;

        let mut grid = SpatialGrid::for_radius(radius, &self.config.grid)?;
        let mut tracker = RangeSet::new();
        let mut points = Vec::new();
        let mut frontier = Vec::new();
        let mut stats = GenerationStats::default();

        grid.insert(SEED_POINT)?;
        points.push(SEED_POINT);
        frontier.push(SEED_POINT);

        while !frontier.is_empty() {
            let p = frontier.swap_remove(rand_index(rng, frontier.len()));
            stats.frontier_pops += 1;

            tracker.reset(0.0, TAU)?;
            for q in grid.points_near(p, reach)? {
                if q == p {
                    continue;
                }
                let dist = p.distance(q);
                if dist >= reach {
                    continue;
                }
                let theta = (dist / reach).clamp(-1.0, 1.0).acos();
                if theta <= 0.0 {
                    continue;
                }
                let angle = (q.y - p.y).atan2(q.x - p.x);
                tracker.subtract(angle - theta, angle + theta)?;
            }

            while !tracker.is_empty() {
                let a = tracker.sample_angle(rng)?;
                tracker.subtract(a - separation, a + separation)?;

                let candidate = p + spacing * Vec2::new(a.cos(), a.sin());
                if grid.contains(candidate) {
                    grid.insert(candidate)?;
                    points.push(candidate);
                    frontier.push(candidate);
                    stats.accepted += 1;
                } else {
                    stats.discarded += 1;
                }
            }
        }

        debug!(
            "Generated pattern for density {:.2}: {} points, radius {:.5}, {} discarded at border.",
            density,
            points.len(),
            radius,
            stats.discarded
        );

        Ok((
            Pattern {
                points,
                radius,
                density,
                coverage: self.config.coverage,
            },
            stats,
        ))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::rng::tests::{FixedRng, ScriptedRng};

    fn pairwise_min_distance(points: &[Vec2]) -> f32 {
        let mut min = f32::MAX;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                min = min.min(points[i].distance(points[j]));
            }
        }
        min
    }

    fn unit_coverage() -> PatternGenerator {
        PatternGenerator::new(GeneratorConfig::new().with_coverage(1.0))
    }

    #[test]
    fn radius_follows_density_formula() {
        let r = exclusion_radius(100.0 / PI, 1.0).unwrap();
        assert!((r - 0.1).abs() < 1e-6);

        let r = exclusion_radius(400.0, DEFAULT_POISSON_COVERAGE).unwrap();
        let expected = 1.0 / (400.0 * PI / DEFAULT_POISSON_COVERAGE).sqrt();
        assert_eq!(r, expected);
    }

    #[test]
    fn non_positive_density_is_rejected() {
        let generator = PatternGenerator::default();
        let mut rng = FixedRng { value: 0 };
        for density in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            let err = generator.generate(density, &mut rng).unwrap_err();
            assert!(matches!(err, Error::InvalidDensity { .. }));
            assert!(err.is_input_error());
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(PatternGenerator::try_new(GeneratorConfig::new().with_coverage(0.0)).is_err());
        assert!(PatternGenerator::try_new(
            GeneratorConfig::new().with_offspring_separation(0.5)
        )
        .is_err());
        assert!(PatternGenerator::try_new(
            GeneratorConfig::new().with_grid(GridConfig::new().with_max_cells_per_axis(0))
        )
        .is_err());
        assert!(PatternGenerator::try_new(GeneratorConfig::default()).is_ok());
    }

    #[test]
    fn second_point_is_spawned_at_two_radii_along_first_interval() {
        let generator = unit_coverage();
        let mut rng = FixedRng { value: 0 };
        let pattern = generator.generate(100.0 / PI, &mut rng).unwrap();

        assert!((pattern.radius() - 0.1).abs() < 1e-6);
        assert_eq!(pattern.points()[0], SEED_POINT);

        let second = pattern.points()[1];
        let offset = second - SEED_POINT;
        assert!((offset.length() - 2.0 * pattern.radius()).abs() < 1e-6);
        // The only interval is [0, 2π) and the angle draw is zero.
        assert!(offset.y.abs() < 1e-6);
        assert!(offset.x > 0.0);
        assert!((second.x - 0.7).abs() < 1e-5);
    }

    #[test]
    fn scripted_draws_choose_the_sampled_angle() {
        let generator = unit_coverage();
        // Frontier pick, interval pick, then an angle at a quarter turn.
        let mut rng = ScriptedRng::new(vec![0, 0, ScriptedRng::word_for(0.25), 0]);
        let pattern = generator.generate(100.0 / PI, &mut rng).unwrap();

        let second = pattern.points()[1];
        assert!((second.x - 0.5).abs() < 1e-5);
        assert!((second.y - 0.7).abs() < 1e-5);
    }

    #[test]
    fn points_respect_minimum_spacing() {
        let generator = PatternGenerator::default();
        let mut rng = StdRng::seed_from_u64(123);
        let pattern = generator.generate(300.0, &mut rng).unwrap();

        assert!(pattern.len() > 1);
        assert!(pairwise_min_distance(pattern.points()) >= pattern.min_spacing() - 1e-4);
    }

    #[test]
    fn points_stay_inside_unit_tile() {
        let generator = PatternGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);
        let pattern = generator.generate(800.0, &mut rng).unwrap();
        for p in pattern.iter() {
            assert!((0.0..1.0).contains(&p.x), "x out of tile: {p:?}");
            assert!((0.0..1.0).contains(&p.y), "y out of tile: {p:?}");
        }
    }

    #[test]
    fn determinism_for_same_seed() {
        let generator = PatternGenerator::default();

        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let pa = generator.generate(250.0, &mut rng_a).unwrap();
        let pb = generator.generate(250.0, &mut rng_b).unwrap();
        assert_eq!(pa, pb);

        let mut rng_c = StdRng::seed_from_u64(456);
        let pc = generator.generate(250.0, &mut rng_c).unwrap();
        assert_ne!(pa.points(), pc.points());
    }

    #[test]
    fn tiny_density_keeps_only_the_seed() {
        let generator = PatternGenerator::default();
        let mut rng = StdRng::seed_from_u64(1);
        let (pattern, stats) = generator.generate_with_stats(0.01, &mut rng).unwrap();

        assert_eq!(pattern.points(), &[SEED_POINT]);
        assert_eq!(stats.accepted, 0);
        assert!(stats.discarded > 0);
        assert_eq!(stats.frontier_pops, 1);
    }

    #[test]
    fn border_candidates_are_discarded_not_stored() {
        let generator = PatternGenerator::default();
        let mut rng = StdRng::seed_from_u64(99);
        let (pattern, stats) = generator.generate_with_stats(150.0, &mut rng).unwrap();

        assert!(stats.discarded > 0);
        assert_eq!(pattern.len(), stats.accepted + 1);
        assert_eq!(stats.frontier_pops, pattern.len());
    }

    #[test]
    fn point_count_tracks_density() {
        let generator = PatternGenerator::default();
        let count = |density: f32| -> usize {
            (0..4u64)
                .map(|seed| {
                    let mut rng = StdRng::seed_from_u64(seed);
                    generator.generate(density, &mut rng).unwrap().len()
                })
                .sum()
        };

        let low = count(100.0);
        let high = count(400.0);
        assert!(high >= low, "density 400 gave {high} points, density 100 gave {low}");

        let per_run = high as f32 / 4.0;
        assert!(per_run > 0.25 * 400.0 && per_run < 1.4 * 400.0);
    }

    #[test]
    fn wider_offspring_separation_yields_sparser_patterns() {
        let narrow = PatternGenerator::default();
        let wide = PatternGenerator::new(GeneratorConfig::new().with_offspring_separation(PI));

        let mut rng_a = StdRng::seed_from_u64(3);
        let mut rng_b = StdRng::seed_from_u64(3);
        let a = narrow.generate(300.0, &mut rng_a).unwrap();
        let b = wide.generate(300.0, &mut rng_b).unwrap();
        assert!(pairwise_min_distance(b.points()) >= b.min_spacing() - 1e-4);
        assert!(b.len() <= a.len());
    }
}
