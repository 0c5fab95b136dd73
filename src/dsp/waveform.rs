use crate::dsp::{
    interpolate::{lerp, InterpolationMode},
    vertex::VertexSet,
};

/*
Vertex Waveform Engine
======================

A conventional oscillator evaluates a formula at every sample. This engine
instead *pulls* its way from vertex to vertex: at any moment there is one
active segment heading from the last value toward the next vertex, and each
call to `calculate` advances it by exactly one sample.

Vocabulary
----------

  tick            One sample step of the engine clock. The clock only ever
                  counts up; it is never reset between periods.

  period_samples  Samples in one cycle at the tuned pitch:
                  max(1, sample_rate / tuned_frequency). Fractional.

  segment         The span currently being interpolated. Either heading to
                  a vertex, or fading to silence after release.


One Period
----------

With vertices at (0.25, +0.5) and (0.75, -0.5) at 440 Hz / 44.1 kHz the
period is ~100 samples and the vertex ticks are 25 and 75:

  segment 1:   0 →  25   from  0.0 to +0.5   (25 ticks)
  segment 2:  25 →  75   from +0.5 to -0.5   (50 ticks)
  segment 3:  75 → 125   wraps: 100 - 75 + 25 = 50 ticks
  ...

The target of one segment is the start of the next, so a new segment always
begins exactly where the previous one ended.


Live Retuning
-------------

Changing pitch recomputes vertex ticks immediately but leaves the running
segment alone. When the next segment is planned, the previous target tick
is rescaled by new_period / old_period so the engine picks up at the same
*relative* position in the new period instead of jumping.


Release
-------

`release()` only sets a flag. The running segment finishes, then a fade
segment ramps the last value down to zero over `note_off_time` periods.
Once the value reaches zero no new segment is started and the engine idles.
*/

/// Longest period the tick clock can address, leaving headroom above every
/// vertex tick for the strictly increasing bump in `VertexSet::recompute`.
const MAX_PERIOD_SAMPLES: f32 = (u32::MAX / 2) as f32;

/// Shared parameters of one interpolating span.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    /// Tuned period length when the segment was planned
    period_samples: f32,
    start_tick: u64,
    duration_ticks: u32,
    from: f32,
    to: f32,
    shape: InterpolationMode,
}

/// The segment currently being rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    ToVertex { span: Span, target_tick: u32 },
    FadeOut { span: Span },
}

impl Segment {
    #[inline]
    fn span(&self) -> &Span {
        match self {
            Segment::ToVertex { span, .. } | Segment::FadeOut { span } => span,
        }
    }

    /// Intra-period position the segment ends on. A fade ends on tick 0.
    #[inline]
    fn target_tick(&self) -> u32 {
        match self {
            Segment::ToVertex { target_tick, .. } => *target_tick,
            Segment::FadeOut { .. } => 0,
        }
    }
}

pub struct WaveformEngine {
    sample_rate: f32,
    vertices: VertexSet,

    // Pitch
    frequency: f32,
    tune: i32,
    fine_tune: f32,
    period_samples: f32,

    // Shape and envelope
    interpolation: InterpolationMode,
    note_off_time: f32,
    released: bool,

    // Runtime state
    tick: u64,
    value: f32,
    segment: Option<Segment>,
}

impl WaveformEngine {
    /// Create an engine with the default two-vertex shape at 440 Hz.
    ///
    /// The engine starts released (silent) until [`retrigger`](Self::retrigger).
    pub fn new(sample_rate: f32) -> Self {
        let mut engine = Self {
            sample_rate,
            vertices: VertexSet::default(),
            frequency: 440.0,
            tune: 0,
            fine_tune: 0.0,
            period_samples: 1.0,
            interpolation: InterpolationMode::Linear,
            note_off_time: 0.5,
            released: true,
            tick: 0,
            value: 0.0,
            segment: None,
        };
        engine.recompute();
        engine
    }

    pub fn set_tune(&mut self, semitones: i32) {
        self.tune = semitones;
        self.recompute();
    }

    pub fn set_fine_tune(&mut self, fraction: f32) {
        self.fine_tune = fraction;
        self.recompute();
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz;
        self.recompute();
    }

    pub fn set_vertices(&mut self, vertices: VertexSet) {
        self.vertices = vertices;
        self.update_vertices();
    }

    /// Direct access for in-place edits. Call [`update_vertices`](Self::update_vertices)
    /// afterwards.
    pub fn vertices_mut(&mut self) -> &mut VertexSet {
        &mut self.vertices
    }

    /// Re-sort the vertex set and recompute its derived ticks.
    pub fn update_vertices(&mut self) {
        self.vertices.sort();
        self.recompute();
    }

    /// Takes effect from the next segment on.
    pub fn set_interpolation(&mut self, mode: InterpolationMode) {
        self.interpolation = mode;
    }

    /// Fade length after release, as a fraction of one period.
    pub fn set_note_off_time(&mut self, fraction: f32) {
        self.note_off_time = fraction;
    }

    /// Stop starting new cycles; the engine fades out on its own schedule.
    pub fn release(&mut self) {
        self.released = true;
    }

    pub fn retrigger(&mut self) {
        self.released = false;
    }

    /// Advance by one sample and return the new output value.
    pub fn calculate(&mut self) -> f32 {
        let exhausted = match &self.segment {
            None => true,
            Some(segment) => {
                let span = segment.span();
                self.tick - span.start_tick >= span.duration_ticks as u64
            }
        };

        if exhausted {
            self.segment = if !self.released {
                Some(self.next_segment())
            } else if self.value != 0.0 {
                Some(self.fade_out())
            } else {
                None
            };
        }

        let Some(segment) = self.segment else {
            self.value = 0.0;
            return self.value;
        };

        let span = segment.span();
        let q = (self.tick - span.start_tick) as f32 / span.duration_ticks as f32;
        let qs = span.shape.shape(q);

        self.tick += 1;
        self.value = lerp(span.from, span.to, qs);
        self.value
    }

    /// Fill `buffer` with consecutive samples.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.calculate();
        }
    }

    /// Tuned frequency in Hz after semitone and fine tuning.
    pub fn tuned_frequency(&self) -> f32 {
        let semitones = self.tune as f32 + self.fine_tune;
        if semitones != 0.0 {
            self.frequency * 2.0_f32.powf(semitones / 12.0)
        } else {
            self.frequency
        }
    }

    pub fn period_samples(&self) -> f32 {
        self.period_samples
    }

    pub fn vertices(&self) -> &VertexSet {
        &self.vertices
    }

    pub fn has_zero_crossing(&self) -> bool {
        self.vertices.has_zero_crossing()
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn tune(&self) -> i32 {
        self.tune
    }

    pub fn fine_tune(&self) -> f32 {
        self.fine_tune
    }

    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    pub fn note_off_time(&self) -> f32 {
        self.note_off_time
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// True once a release has fully faded and no segment is running.
    pub fn is_idle(&self) -> bool {
        self.released && self.segment.is_none()
    }

    fn recompute(&mut self) {
        // NaN collapses to one sample
        self.period_samples = (self.sample_rate / self.tuned_frequency())
            .max(1.0)
            .min(MAX_PERIOD_SAMPLES);
        self.vertices.recompute(self.period_samples);
    }

    /// Plan the segment toward the next vertex.
    fn next_segment(&self) -> Segment {
        let period = self.period_samples;

        let (from, start_pos) = match &self.segment {
            Some(prev) => {
                let span = prev.span();
                // Pitch moved since the previous segment was planned: keep the
                // same relative position in the new period
                let factor = if span.period_samples != period {
                    period / span.period_samples
                } else {
                    1.0
                };
                let start_pos = (factor * prev.target_tick() as f32).round() as u32;
                (span.to, start_pos)
            }
            None => (0.0, 0),
        };

        let target = self.vertices.next_after(start_pos);
        let target_tick = target.tick();

        // Equal positions take the non-wrapping branch (zero distance, clamped to 1)
        let distance = if start_pos > target_tick {
            period - start_pos as f32 + target_tick as f32
        } else {
            (target_tick - start_pos) as f32
        };

        Segment::ToVertex {
            span: Span {
                period_samples: period,
                start_tick: self.tick,
                duration_ticks: min_one_tick(distance),
                from,
                to: target.amplitude(),
                shape: self.interpolation,
            },
            target_tick,
        }
    }

    /// Plan the release fade from the last target value down to zero.
    fn fade_out(&self) -> Segment {
        let from = self.segment.map_or(0.0, |s| s.span().to);
        Segment::FadeOut {
            span: Span {
                period_samples: self.period_samples,
                start_tick: self.tick,
                duration_ticks: min_one_tick(self.period_samples * self.note_off_time),
                from,
                to: 0.0,
                shape: self.interpolation,
            },
        }
    }
}

#[inline]
fn min_one_tick(samples: f32) -> u32 {
    samples.round().max(1.0) as u32
}
