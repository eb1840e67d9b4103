//! Angular range tracking around a pivot point.
//!
//! A [`RangeSet`] stores the directions around a point that are still free, as
//! a sorted list of disjoint half-open arcs. Blocked arcs are carved out with
//! [`RangeSet::subtract`]; free directions are drawn with
//! [`RangeSet::sample_angle`].
use std::f32::consts::TAU;

use rand::RngCore;

use crate::error::{Error, Result};
use crate::rng::{rand01, rand_index};

/// Arcs this close to a full turn are treated as covering the whole circle,
/// so rounding in `a - h .. a + h` cannot leave a sliver next to `a`.
const FULL_TURN_TOLERANCE: f32 = 1e-5;

/// A contiguous half-open arc `[min, max)` of directions, in radians.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngularInterval {
    pub min: f32,
    pub max: f32,
}

impl AngularInterval {
    /// Create an interval, rejecting empty, reversed or non-finite bounds.
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::InvalidInterval { lo: min, hi: max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.min && angle < self.max
    }

    /// Map a fraction in [0, 1) onto the interval, never returning `max`.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        (self.min + t * self.width()).min(next_down(self.max))
    }
}

/// Compute the next smaller representable float value.
#[inline]
fn next_down(val: f32) -> f32 {
    if val.is_nan() || val == f32::NEG_INFINITY {
        return val;
    }
    if val == f32::INFINITY {
        return f32::MAX;
    }
    if val == 0.0 {
        return -f32::from_bits(1);
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits - 1)
    } else {
        f32::from_bits(bits + 1)
    }
}

/// Set of disjoint angular intervals kept sorted by `min`.
#[derive(Clone, Debug, Default)]
pub struct RangeSet {
    intervals: Vec<AngularInterval>,
    scratch: Vec<AngularInterval>,
}

impl RangeSet {
    /// Create an empty range set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a range set covering the whole circle `[0, 2π)`.
    pub fn full_circle() -> Self {
        Self {
            intervals: vec![AngularInterval { min: 0.0, max: TAU }],
            scratch: Vec::new(),
        }
    }

    /// Replace the contents with the single interval `[min, max)`.
    pub fn reset(&mut self, min: f32, max: f32) -> Result<()> {
        let interval = AngularInterval::new(min, max)?;
        self.intervals.clear();
        self.intervals.push(interval);
        Ok(())
    }

    /// Remove the arc `[lo, hi)` from every interval it overlaps.
    ///
    /// Bounds are taken modulo a full turn. An arc that crosses `2π` is removed
    /// as two pieces; an arc of (nearly) a full turn or more empties the set.
    pub fn subtract(&mut self, lo: f32, hi: f32) -> Result<()> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(Error::InvalidInterval { lo, hi });
        }
        if hi - lo >= TAU - FULL_TURN_TOLERANCE {
            self.intervals.clear();
            return Ok(());
        }

        let mut start = lo.rem_euclid(TAU);
        if start >= TAU {
            start -= TAU;
        }
        let shift = lo - start;
        let (start, end) = (lo - shift, hi - shift);

        if end > TAU {
            self.subtract_linear(start, TAU);
            self.subtract_linear(0.0, end - TAU);
        } else {
            self.subtract_linear(start, end);
        }
        Ok(())
    }

    fn subtract_linear(&mut self, lo: f32, hi: f32) {
        if lo >= hi {
            return;
        }
        self.scratch.clear();
        for iv in &self.intervals {
            if hi <= iv.min || lo >= iv.max {
                self.scratch.push(*iv);
                continue;
            }
            if iv.min < lo {
                self.scratch.push(AngularInterval {
                    min: iv.min,
                    max: lo,
                });
            }
            if hi < iv.max {
                self.scratch.push(AngularInterval {
                    min: hi,
                    max: iv.max,
                });
            }
        }
        std::mem::swap(&mut self.intervals, &mut self.scratch);
    }

    /// Number of remaining disjoint intervals.
    #[inline]
    pub fn count(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[AngularInterval] {
        &self.intervals
    }

    /// Total angular measure still available, in radians.
    pub fn total_measure(&self) -> f32 {
        self.intervals.iter().map(AngularInterval::width).sum()
    }

    /// Pick one remaining interval uniformly at random.
    pub fn pick_random_interval(&self, rng: &mut dyn RngCore) -> Result<AngularInterval> {
        if self.intervals.is_empty() {
            return Err(Error::EmptyRange);
        }
        let idx = rand_index(rng, self.intervals.len());
        Ok(self.intervals[idx])
    }

    /// Pick a random interval, then a uniformly distributed angle inside it.
    ///
    /// Consumes exactly two draws from `rng`.
    pub fn sample_angle(&self, rng: &mut dyn RngCore) -> Result<f32> {
        let interval = self.pick_random_interval(rng)?;
        Ok(interval.lerp(rand01(rng)))
    }
}
