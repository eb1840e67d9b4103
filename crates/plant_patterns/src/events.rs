//! Event types and sinks for observing pattern-set builds.
//!
//! This module defines [`PatternSetEvent`] and a set of sinks to collect or
//! forward events while executing
//! [`crate::pattern_set::PatternSet::build_with_events`].
use crate::generator::GenerationStats;
use crate::pattern_set::RandomStreams;

/// Describes events emitted while building a pattern set.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum PatternSetEvent {
    /// Emitted once before any level is generated.
    BuildStarted {
        /// Number of density levels requested.
        pattern_count: usize,
        /// How random streams are assigned to levels.
        streams: RandomStreams,
    },

    /// Emitted after a level's pattern and vertex buffer are complete.
    LevelFinished {
        /// Level index.
        level: usize,
        /// Target density used for this level.
        density: f32,
        /// Exclusion radius derived from the density.
        radius: f32,
        /// Number of vertices in the level's buffer.
        vertices: usize,
        /// Generation counters for this level.
        stats: GenerationStats,
    },

    /// Emitted once when every level is built.
    BuildFinished {
        /// Smallest vertex count over all levels.
        min_vertices: usize,
        /// Largest vertex count over all levels.
        max_vertices: usize,
    },

    /// Non-fatal warning generated during the build.
    Warning {
        /// Context string (e.g. level index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PatternSetEvent`], used for sink filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternSetEventKind {
    BuildStarted,
    LevelFinished,
    BuildFinished,
    Warning,
}

impl PatternSetEvent {
    pub fn kind(&self) -> PatternSetEventKind {
        match self {
            PatternSetEvent::BuildStarted { .. } => PatternSetEventKind::BuildStarted,
            PatternSetEvent::LevelFinished { .. } => PatternSetEventKind::LevelFinished,
            PatternSetEvent::BuildFinished { .. } => PatternSetEventKind::BuildFinished,
            PatternSetEvent::Warning { .. } => PatternSetEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PatternSetEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PatternSetEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: PatternSetEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PatternSetEvent) {}

    #[inline]
    fn wants(&self, _kind: PatternSetEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PatternSetEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PatternSetEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PatternSetEvent),
{
    #[inline]
    fn send(&mut self, event: PatternSetEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PatternSetEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<PatternSetEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PatternSetEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PatternSetEvent) {
        self.events.push(event);
    }
}

/// Sink wrapper that only forwards the listed event kinds.
pub struct FilterSink<S: EventSink> {
    inner: S,
    kinds: Vec<PatternSetEventKind>,
}

impl<S: EventSink> FilterSink<S> {
    pub fn new(inner: S, kinds: impl IntoIterator<Item = PatternSetEventKind>) -> Self {
        Self {
            inner,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilterSink<S> {
    fn send(&mut self, event: PatternSetEvent) {
        if self.wants(event.kind()) {
            self.inner.send(event);
        }
    }

    fn wants(&self, kind: PatternSetEventKind) -> bool {
        self.kinds.contains(&kind) && self.inner.wants(kind)
    }
}
