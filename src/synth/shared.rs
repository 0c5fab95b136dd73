use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{
    config::SynthConfig,
    dsp::{InterpolationMode, VertexSet},
    synth::{message::SynthMessage, voice::Voice},
};

/*
Control Path
============

The UI (or a MIDI thread) and the audio callback run concurrently. Instead
of sharing the voice behind a lock, the control side sends messages over a
single-producer/single-consumer ring:

    UI thread                               audio thread
    ---------                               ------------
    VoiceHandle::set_frequency ──► ring ──► SharedVoice::render
                                             ├─ drain messages
                                             ├─ render buffer
                                             └─ publish status
    VoiceHandle::is_protection_tripped ◄── atomics ◄──┘

Messages are applied between buffers, so a buffer never sees a half-applied
change. Status flows back through atomics with relaxed ordering; the flags
are independent and only used for display.
*/

const MESSAGE_QUEUE_SIZE: usize = 256;

/// Flags published by the audio thread after every buffer.
#[derive(Debug, Default)]
pub struct VoiceStatus {
    protection_tripped: AtomicBool,
    sounding: AtomicBool,
    frames_rendered: AtomicU64,
}

impl VoiceStatus {
    pub fn is_protection_tripped(&self) -> bool {
        self.protection_tripped.load(Ordering::Relaxed)
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding.load(Ordering::Relaxed)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    fn publish(&self, voice: &Voice, frames: usize) {
        self.protection_tripped
            .store(voice.is_protection_tripped(), Ordering::Relaxed);
        self.sounding.store(voice.is_sounding(), Ordering::Relaxed);
        self.frames_rendered
            .fetch_add(frames as u64, Ordering::Relaxed);
    }
}

/// Audio-thread side: owns the voice and the receiving end of the ring.
pub struct SharedVoice {
    voice: Voice,
    rx: Consumer<SynthMessage>,
    status: Arc<VoiceStatus>,
}

/// Control-thread side: sends parameter and trigger changes.
pub struct VoiceHandle {
    tx: Producer<SynthMessage>,
    status: Arc<VoiceStatus>,
}

impl SharedVoice {
    pub fn new(config: &SynthConfig) -> (Self, VoiceHandle) {
        let (tx, rx) = RingBuffer::<SynthMessage>::new(MESSAGE_QUEUE_SIZE);
        let status = Arc::new(VoiceStatus::default());

        let handle = VoiceHandle {
            tx,
            status: Arc::clone(&status),
        };
        let node = Self {
            voice: Voice::new(config),
            rx,
            status,
        };

        (node, handle)
    }

    /// Drain pending messages, then render mono samples into `out`.
    pub fn render(&mut self, out: &mut [f32]) {
        self.voice.process_messages(&mut self.rx);
        self.voice.render(out);
        self.status.publish(&self.voice, out.len());
    }

    /// Drain pending messages, then render into an interleaved buffer.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        self.voice.process_messages(&mut self.rx);
        self.voice.render_interleaved(data, channels);
        self.status
            .publish(&self.voice, data.len() / channels.max(1));
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }
}

impl VoiceHandle {
    /// Queue a message. If the ring is full the message is dropped and the
    /// rejected message is returned.
    pub fn try_push(&mut self, msg: SynthMessage) -> Result<(), SynthMessage> {
        self.tx.push(msg).map_err(|PushError::Full(msg)| msg)
    }

    /// Queue a message, logging when the audio thread has fallen behind.
    pub fn push(&mut self, msg: SynthMessage) {
        if let Err(msg) = self.try_push(msg) {
            log::warn!(target: "synth::handle", "control queue full, dropped {msg:?}");
        }
    }

    pub fn note_on(&mut self) {
        self.push(SynthMessage::NoteOn);
    }

    pub fn note_off(&mut self) {
        self.push(SynthMessage::NoteOff);
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.push(SynthMessage::SetFrequency(hz));
    }

    pub fn set_tune(&mut self, semitones: i32) {
        self.push(SynthMessage::SetTune(semitones));
    }

    pub fn set_fine_tune(&mut self, fraction: f32) {
        self.push(SynthMessage::SetFineTune(fraction));
    }

    pub fn set_vertices(&mut self, vertices: VertexSet) {
        self.push(SynthMessage::SetVertices(vertices));
    }

    pub fn set_interpolation(&mut self, mode: InterpolationMode) {
        self.push(SynthMessage::SetInterpolation(mode));
    }

    pub fn set_smoothing(&mut self, amount: f32) {
        self.push(SynthMessage::SetSmoothing(amount));
    }

    pub fn set_note_off_time(&mut self, fraction: f32) {
        self.push(SynthMessage::SetNoteOffTime(fraction));
    }

    pub fn set_speaker_protection_enabled(&mut self, enabled: bool) {
        self.push(SynthMessage::SetSpeakerProtection(enabled));
    }

    pub fn is_protection_tripped(&self) -> bool {
        self.status.is_protection_tripped()
    }

    pub fn is_sounding(&self) -> bool {
        self.status.is_sounding()
    }

    pub fn status(&self) -> &VoiceStatus {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_messages_reach_the_voice_on_next_render() {
        let (mut voice, mut handle) = SharedVoice::new(&SynthConfig::default());
        handle.set_frequency(220.0);
        handle.set_interpolation(InterpolationMode::Quadratic);
        handle.note_on();

        // Nothing applied until the audio thread renders
        assert!(voice.voice().engine().is_released());

        let mut buf = [0.0f32; 128];
        voice.render(&mut buf);
        let engine = voice.voice().engine();
        assert_eq!(engine.frequency(), 220.0);
        assert_eq!(engine.interpolation(), InterpolationMode::Quadratic);
        assert!(handle.is_sounding());
        assert_eq!(handle.status().frames_rendered(), 128);
    }

    #[test]
    fn full_queue_rejects_without_blocking() {
        let (_voice, mut handle) = SharedVoice::new(&SynthConfig::default());
        for _ in 0..MESSAGE_QUEUE_SIZE {
            assert!(handle.try_push(SynthMessage::NoteOn).is_ok());
        }
        assert!(matches!(
            handle.try_push(SynthMessage::SetTune(3)),
            Err(SynthMessage::SetTune(3))
        ));
        // Logged and dropped
        handle.note_off();
    }

    #[test]
    fn protection_trip_is_published_to_the_handle() {
        let config = SynthConfig::default().with_buffer_size(32);
        let (mut voice, mut handle) = SharedVoice::new(&config);
        handle.set_vertices(VertexSet::from_points(&[(0.1, 0.8), (0.6, 0.9)]).unwrap());
        handle.note_on();

        let mut data = vec![0.0f32; 32 * 2];
        for _ in 0..8 {
            voice.render_interleaved(&mut data, 2);
        }
        assert!(handle.is_protection_tripped());
        assert_eq!(handle.status().frames_rendered(), 8 * 32);

        handle.note_on();
        voice.render_interleaved(&mut data, 2);
        assert!(!handle.is_protection_tripped());
    }
}
