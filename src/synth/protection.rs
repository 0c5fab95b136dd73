/*
Speaker Protection
==================

A vertex shape whose points never cross zero, e.g. every amplitude above 0,
does not produce an audible tone so much as a constant offset. Sustained DC
pushes the speaker cone to one side and keeps it there, which heats the voice
coil for no sound at all.

The guard watches the post-processing signal for long one-sided runs:

    value >  +0.01 and run >= 0   → run += 1
    value <  -0.01 and run <= 0   → run -= 1
    anything else                 → run  = 0   (sign change or near zero)

If |run| grows past `TRIP_BUFFERS` render buffers the guard trips. The
voice then releases (a normal fade, not a hard cut) and the tripped flag
stays set until the next note-on.

A normal audio waveform alternates sign every half period, so even at 20 Hz
the run is reset long before it gets near the limit.
*/

/// Magnitude below which a sample counts as "at zero".
pub const DC_THRESHOLD: f32 = 0.01;

/// How many render buffers of one-sided signal are tolerated.
pub const TRIP_BUFFERS: usize = 4;

#[derive(Debug, Clone)]
pub struct SpeakerGuard {
    enabled: bool,
    run: i64,
    limit: u64,
    tripped: bool,
}

impl SpeakerGuard {
    pub fn new(buffer_size: usize, enabled: bool) -> Self {
        Self {
            enabled,
            run: 0,
            limit: (buffer_size * TRIP_BUFFERS) as u64,
            tripped: false,
        }
    }

    /// Feed one sample. Returns true on the sample that trips the guard.
    #[inline]
    pub fn check(&mut self, value: f32) -> bool {
        if !self.enabled {
            return false;
        }

        if value > DC_THRESHOLD && self.run >= 0 {
            self.run += 1;
        } else if value < -DC_THRESHOLD && self.run <= 0 {
            self.run -= 1;
        } else {
            self.run = 0;
        }

        if self.run.unsigned_abs() > self.limit {
            self.run = 0;
            self.tripped = true;
            return true;
        }
        false
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Clear the sticky trip flag.
    pub fn clear_trip(&mut self) {
        self.tripped = false;
    }

    /// Current signed run length, in samples.
    pub fn run(&self) -> i64 {
        self.run
    }

    /// Run length that trips the guard.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}
