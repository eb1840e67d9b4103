#![forbid(unsafe_code)]
//! plant_patterns: Poisson-disc point patterns for level-of-detail vegetation placement.
//!
//! Modules:
//! - angular: free-direction tracking around a pivot as disjoint arcs
//! - grid: uniform spatial grid for neighbour queries over the unit tile
//! - generator: frontier-propagation dart throwing for one target density
//! - pattern_set: one pattern and vertex buffer per density level, plus events
//!
//! All randomness is supplied by the caller through `&mut dyn RngCore`.
pub mod angular;
pub mod error;
pub mod events;
pub mod generator;
pub mod grid;
pub mod pattern_set;
pub mod rng;

/// Convenient re-exports for common types. Import with `use plant_patterns::prelude::*;`.
pub mod prelude {
    pub use crate::angular::{AngularInterval, RangeSet};
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        EventSink, FilterSink, FnSink, PatternSetEvent, PatternSetEventKind, VecSink,
    };
    pub use crate::generator::{
        exclusion_radius, GenerationStats, GeneratorConfig, Pattern, PatternGenerator,
        DEFAULT_POISSON_COVERAGE, SEED_POINT,
    };
    pub use crate::grid::{CellCoord, GridConfig, SpatialGrid};
    pub use crate::pattern_set::{
        DensityInterpolation, PatternBuffer, PatternLevel, PatternSet, PatternSetConfig,
        RandomStreams,
    };
    pub use crate::rng::{rand01, seed_for_level};
}
