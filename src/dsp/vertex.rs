use thiserror::Error;

/*
Vertices
========

A waveform period is described by a handful of control points. Each point
has a phase (where in the cycle it sits, 0.0 = start, 1.0 = start of the
next cycle) and an amplitude (-1.0 .. 1.0):

   +1 ┤
      │      ● (0.25, 0.5)
    0 ┼─────────────────────────────── phase
      │                    ● (0.75, -0.5)
   -1 ┤
      0        0.25       0.5       0.75       1

The engine does not work in phase units though, it counts samples. Once the
pitch is known every vertex gets a derived `tick`: its sample offset inside
one period.

    tick = round(phase * period_samples)

Two vertices with nearly the same phase can round onto the same tick. That
would leave a zero-length segment between them, so a colliding tick is
bumped one past its predecessor. The first vertex is compared against tick 0,
which means every tick is at least 1 and ticks are strictly increasing.

The set has a fixed capacity so it is `Copy` and can travel through the
control ring into the audio thread without touching the allocator.
*/

/// Maximum number of vertices in one waveform period.
pub const MAX_VERTICES: usize = 32;

/// Largest phase value accepted by [`Phase::clamped`].
pub const MAX_PHASE: f32 = 1.0 - f32::EPSILON;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum VertexError {
    #[error("phase {0} is outside [0, 1)")]
    PhaseOutOfRange(f32),
    #[error("amplitude {0} is outside [-1, 1]")]
    AmplitudeOutOfRange(f32),
    #[error("a vertex set needs at least one vertex")]
    Empty,
    #[error("a vertex set holds at most {max} vertices")]
    TooMany { max: usize },
    #[error("vertex index {index} is out of bounds for a set of {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Position inside one waveform period, in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Phase(f32);

impl Phase {
    pub const ZERO: Phase = Phase(0.0);

    pub fn new(value: f32) -> Result<Self, VertexError> {
        if value.is_finite() && (0.0..1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(VertexError::PhaseOutOfRange(value))
        }
    }

    /// Saturate into range instead of rejecting. NaN maps to zero.
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, MAX_PHASE))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

/// Signal level of a vertex, in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amplitude(f32);

impl Amplitude {
    pub const ZERO: Amplitude = Amplitude(0.0);

    pub fn new(value: f32) -> Result<Self, VertexError> {
        if value.is_finite() && (-1.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(VertexError::AmplitudeOutOfRange(value))
        }
    }

    /// Saturate into range instead of rejecting. NaN maps to zero.
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(-1.0, 1.0))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

/// A control point on the waveform period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    phase: Phase,
    amplitude: Amplitude,
    /// Derived sample offset within one period, see [`VertexSet::recompute`]
    tick: u32,
}

impl Vertex {
    pub fn new(phase: Phase, amplitude: Amplitude) -> Self {
        Self {
            phase,
            amplitude,
            tick: 0,
        }
    }

    /// Validate raw numbers and build a vertex.
    pub fn try_new(phase: f32, amplitude: f32) -> Result<Self, VertexError> {
        Ok(Self::new(Phase::new(phase)?, Amplitude::new(amplitude)?))
    }

    pub fn phase(&self) -> f32 {
        self.phase.get()
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude.get()
    }

    /// Sample offset inside the period as of the last recompute.
    pub fn tick(&self) -> u32 {
        self.tick
    }
}

const EMPTY_SLOT: Vertex = Vertex {
    phase: Phase::ZERO,
    amplitude: Amplitude::ZERO,
    tick: 0,
};

/// Ordered, fixed-capacity collection of vertices describing one period.
///
/// Always holds between 1 and [`MAX_VERTICES`] vertices, sorted by phase.
#[derive(Debug, Clone, Copy)]
pub struct VertexSet {
    vertices: [Vertex; MAX_VERTICES],
    len: usize,
    has_zero_crossing: bool,
}

impl VertexSet {
    pub fn new(vertices: &[Vertex]) -> Result<Self, VertexError> {
        if vertices.is_empty() {
            return Err(VertexError::Empty);
        }
        if vertices.len() > MAX_VERTICES {
            return Err(VertexError::TooMany { max: MAX_VERTICES });
        }

        let mut set = Self {
            vertices: [EMPTY_SLOT; MAX_VERTICES],
            len: vertices.len(),
            has_zero_crossing: false,
        };
        set.vertices[..vertices.len()].copy_from_slice(vertices);
        set.sort();
        set.update_zero_crossing();
        Ok(set)
    }

    /// Build a set from raw `(phase, amplitude)` pairs, validating each.
    pub fn from_points(points: &[(f32, f32)]) -> Result<Self, VertexError> {
        if points.len() > MAX_VERTICES {
            return Err(VertexError::TooMany { max: MAX_VERTICES });
        }
        let mut buf = [EMPTY_SLOT; MAX_VERTICES];
        for (slot, &(phase, amplitude)) in buf.iter_mut().zip(points) {
            *slot = Vertex::try_new(phase, amplitude)?;
        }
        Self::new(&buf[..points.len()])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Never true for a set built through the constructors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.as_slice().iter()
    }

    pub fn get(&self, index: usize) -> Option<&Vertex> {
        self.as_slice().get(index)
    }

    /// Insert a vertex, returning its index after re-sorting.
    pub fn push(&mut self, vertex: Vertex) -> Result<usize, VertexError> {
        if self.len == MAX_VERTICES {
            return Err(VertexError::TooMany { max: MAX_VERTICES });
        }
        self.vertices[self.len] = vertex;
        self.len += 1;
        Ok(self.resort_locating(self.len - 1))
    }

    /// Remove the vertex at `index`. The last remaining vertex cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<Vertex, VertexError> {
        self.check_index(index)?;
        if self.len == 1 {
            return Err(VertexError::Empty);
        }
        let removed = self.vertices[index];
        self.vertices.copy_within(index + 1..self.len, index);
        self.len -= 1;
        self.vertices[self.len] = EMPTY_SLOT;
        self.update_zero_crossing();
        Ok(removed)
    }

    /// Replace the vertex at `index` (e.g. after a drag), returning where it
    /// landed after re-sorting.
    pub fn replace(&mut self, index: usize, vertex: Vertex) -> Result<usize, VertexError> {
        self.check_index(index)?;
        self.vertices[index] = vertex;
        Ok(self.resort_locating(index))
    }

    /// Stable sort by ascending phase.
    pub fn sort(&mut self) {
        self.vertices[..self.len].sort_by(|a, b| a.phase.get().total_cmp(&b.phase.get()));
    }

    /// Recalculate every derived tick for a period of `period_samples`.
    ///
    /// Assumes the set is sorted.
    pub fn recompute(&mut self, period_samples: f32) {
        let mut prev_tick = 0u32;
        for vertex in self.vertices[..self.len].iter_mut() {
            let mut tick = (vertex.phase.get() * period_samples).round() as u32;
            if tick <= prev_tick {
                tick = prev_tick.saturating_add(1);
            }
            vertex.tick = tick;
            prev_tick = tick;
        }
        self.update_zero_crossing();
    }

    /// True when the amplitudes straddle zero (min <= 0 <= max).
    pub fn has_zero_crossing(&self) -> bool {
        self.has_zero_crossing
    }

    /// The first vertex whose tick lies strictly after `reference`, wrapping
    /// to the start of the set when `reference` is past the last vertex.
    pub fn next_after(&self, reference: u32) -> &Vertex {
        let slice = self.as_slice();
        let cursor = slice.partition_point(|v| v.tick <= reference);
        &slice[cursor % slice.len()]
    }

    fn check_index(&self, index: usize) -> Result<(), VertexError> {
        if index >= self.len {
            Err(VertexError::IndexOutOfBounds {
                index,
                len: self.len,
            })
        } else {
            Ok(())
        }
    }

    /// Sort, and follow the vertex that was at `index` to its new slot.
    fn resort_locating(&mut self, index: usize) -> usize {
        let target = self.vertices[index];
        self.sort();
        self.update_zero_crossing();
        self.as_slice()
            .iter()
            .position(|v| *v == target)
            .unwrap_or(index)
    }

    fn update_zero_crossing(&mut self) {
        let (min, max) = self
            .iter()
            .fold((f32::MAX, f32::MIN), |(min, max), v| {
                (min.min(v.amplitude()), max.max(v.amplitude()))
            });
        self.has_zero_crossing = min <= 0.0 && max >= 0.0;
    }
}

impl Default for VertexSet {
    /// The classic starting shape: one peak and one trough, a triangle wave.
    fn default() -> Self {
        let peak = Vertex::new(Phase(0.25), Amplitude(0.5));
        let trough = Vertex::new(Phase(0.75), Amplitude(-0.5));
        let mut vertices = [EMPTY_SLOT; MAX_VERTICES];
        vertices[0] = peak;
        vertices[1] = trough;
        Self {
            vertices,
            len: 2,
            has_zero_crossing: true,
        }
    }
}
