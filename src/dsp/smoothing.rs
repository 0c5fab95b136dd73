/*
One-Pole Smoothing
==================

Vertex waveforms can have hard corners, and with very few ticks per segment
they turn into stair steps. A one-pole low-pass softens those edges:

    y[n] = x[n] * (1 - k') + y[n-1] * k'        with k' = 0.99 * amount

`amount` = 0 bypasses the filter entirely. At `amount` = 1 the feedback is
0.99, so the filter never quite freezes on its previous output.

The filter remembers the last *output* sample even while bypassed, so turning
smoothing on mid-note does not start from a stale value.
*/

/// Scale applied to the smoothing amount, keeps the pole inside the unit circle.
const MAX_FEEDBACK: f32 = 0.99;

#[derive(Debug, Clone, Copy, Default)]
pub struct Smoother {
    amount: f32,
    last: f32,
}

impl Smoother {
    pub fn new(amount: f32) -> Self {
        Self { amount, last: 0.0 }
    }

    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount;
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, raw: f32) -> f32 {
        let out = if self.amount != 0.0 {
            let k = self.amount * MAX_FEEDBACK;
            raw * (1.0 - k) + self.last * k
        } else {
            raw
        };
        self.last = out;
        out
    }

    pub fn reset(&mut self) {
        self.last = 0.0;
    }
}
