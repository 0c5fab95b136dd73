use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::{InterpolationMode, VertexSet};

/// Control-path events applied to a voice between render buffers.
#[derive(Debug, Copy, Clone)]
pub enum SynthMessage {
    NoteOn,
    NoteOff,
    SetFrequency(f32),
    SetTune(i32),
    SetFineTune(f32),
    SetVertices(VertexSet),
    SetInterpolation(InterpolationMode),
    SetSmoothing(f32),
    SetNoteOffTime(f32),
    SetSpeakerProtection(bool),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Offline rendering and tests
impl MessageReceiver for VecDeque<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.pop_front()
    }
}
