#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Segment Shaping
===============

The engine only knows the waveform at a handful of vertices. Between two
vertices it walks a straight line from `from` to `to`, but the *progress*
along that line can be bent before it is applied:

    value = lerp(from, to, shape(q))      where q = elapsed / duration

Every shape maps [0, 1] onto [0, 1] and passes through (0.5, 0.5), so the
segment always starts at `from`, ends at `to` and crosses the midpoint
halfway. Only the timbre of the edge changes.

  linear      q                      straight ramps, triangle/saw character
  spike       ((2q-1)^3 + 1) / 2     fast-slow-fast: steep at both ends,
                                     flat in the middle (plateau)
  quadratic   ease-in/ease-out       slow-fast-slow with a square law
  cubic       ease-in/ease-out       same, cube law, closer to a square wave
*/

/// Curve applied to segment progress before interpolation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    Linear,
    Spike,
    Quadratic,
    Cubic,
}

impl InterpolationMode {
    pub const ALL: [InterpolationMode; 4] = [
        InterpolationMode::Linear,
        InterpolationMode::Spike,
        InterpolationMode::Quadratic,
        InterpolationMode::Cubic,
    ];

    /// Map linear progress `q` in [0, 1] to shaped progress in [0, 1].
    #[inline]
    pub fn shape(self, q: f32) -> f32 {
        match self {
            InterpolationMode::Linear => q,
            InterpolationMode::Spike => (((q - 0.5) / 0.5).powi(3) + 1.0) / 2.0,
            InterpolationMode::Quadratic => ease_in_out(q, 2),
            InterpolationMode::Cubic => ease_in_out(q, 3),
        }
    }

    /// The next mode in display order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            InterpolationMode::Linear => "linear",
            InterpolationMode::Spike => "spike",
            InterpolationMode::Quadratic => "quadratic",
            InterpolationMode::Cubic => "cubic",
        }
    }
}

/// Symmetric power curve: accelerate up to the midpoint, mirror after it.
#[inline]
fn ease_in_out(q: f32, exp: i32) -> f32 {
    if q < 0.5 {
        (q / 0.5).powi(exp) / 2.0
    } else {
        -((((1.0 - q) / 0.5).powi(exp) - 1.0) / 2.0) + 0.5
    }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, q: f32) -> f32 {
    (1.0 - q) * a + q * b
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn shapes_hit_endpoints_and_midpoint() {
        for mode in InterpolationMode::ALL {
            assert!(mode.shape(0.0).abs() < EPS, "{mode:?} at 0");
            assert!((mode.shape(1.0) - 1.0).abs() < EPS, "{mode:?} at 1");
            assert!((mode.shape(0.5) - 0.5).abs() < EPS, "{mode:?} at 0.5");
        }
    }

    #[test]
    fn shapes_stay_in_unit_range() {
        for mode in InterpolationMode::ALL {
            for i in 0..=1000 {
                let q = i as f32 / 1000.0;
                let qs = mode.shape(q);
                assert!((-EPS..=1.0 + EPS).contains(&qs), "{mode:?}({q}) = {qs}");
            }
        }
    }

    #[test]
    fn shapes_are_symmetric_about_midpoint() {
        for mode in InterpolationMode::ALL {
            for i in 0..=50 {
                let q = i as f32 / 100.0;
                let sum = mode.shape(q) + mode.shape(1.0 - q);
                assert!((sum - 1.0).abs() < 1e-5, "{mode:?} not symmetric at {q}");
            }
        }
    }

    #[test]
    fn eased_curves_are_slow_at_the_start() {
        assert!((InterpolationMode::Quadratic.shape(0.25) - 0.125).abs() < EPS);
        assert!((InterpolationMode::Cubic.shape(0.25) - 0.0625).abs() < EPS);
        // Spike is the opposite: it has already covered most of the first half
        assert!((InterpolationMode::Spike.shape(0.25) - 0.4375).abs() < EPS);
    }

    #[test]
    fn lerp_blends_linearly() {
        assert_eq!(lerp(-0.5, 0.5, 0.0), -0.5);
        assert_eq!(lerp(-0.5, 0.5, 1.0), 0.5);
        assert!((lerp(0.0, 1.0, 0.3) - 0.3).abs() < EPS);
    }

    #[test]
    fn next_cycles_through_all_modes() {
        let mut mode = InterpolationMode::Linear;
        for expected in [
            InterpolationMode::Spike,
            InterpolationMode::Quadratic,
            InterpolationMode::Cubic,
            InterpolationMode::Linear,
        ] {
            mode = mode.next();
            assert_eq!(mode, expected);
        }
    }
}
