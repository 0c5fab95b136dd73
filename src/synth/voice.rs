use crate::{
    config::SynthConfig,
    dsp::{smoothing::Smoother, waveform::WaveformEngine, InterpolationMode, VertexSet},
    synth::{
        message::{MessageReceiver, SynthMessage},
        protection::SpeakerGuard,
    },
};

/// The single voice: waveform engine, smoothing and speaker protection.
///
/// Driven at buffer granularity by the audio callback. Every frame pulls one
/// sample from the engine, smooths it, runs the protection check and writes
/// the result to all output channels.
pub struct Voice {
    engine: WaveformEngine,
    smoother: Smoother,
    guard: SpeakerGuard,
    buffer_size: usize,
}

impl Voice {
    /// Build a voice from a config. The config is not validated here.
    pub fn new(config: &SynthConfig) -> Self {
        let mut engine = WaveformEngine::new(config.sample_rate);
        engine.set_frequency(config.frequency);
        engine.set_tune(config.tune);
        engine.set_fine_tune(config.fine_tune);
        engine.set_interpolation(config.interpolation);
        engine.set_note_off_time(config.note_off_time);

        Self {
            engine,
            smoother: Smoother::new(config.smoothing),
            guard: SpeakerGuard::new(config.buffer_size, config.speaker_protection),
            buffer_size: config.buffer_size,
        }
    }

    /// Gate high: start producing cycles and clear any protection trip.
    pub fn note_on(&mut self) {
        self.engine.retrigger();
        self.guard.clear_trip();
    }

    /// Gate low: the engine fades out on its own schedule.
    pub fn note_off(&mut self) {
        self.engine.release();
    }

    /// Produce one post-processed sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let raw = self.engine.calculate();
        let out = self.smoother.process(raw);
        if self.guard.check(out) {
            self.note_off();
        }
        out
    }

    /// Render mono samples into `out`.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Render into an interleaved buffer, duplicating each frame across
    /// `channels`.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in data.chunks_mut(channels) {
            let sample = self.next_sample();
            frame.fill(sample);
        }
    }

    /// Allocating convenience for offline use.
    pub fn render_buffer(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.render(&mut out);
        out
    }

    /// Apply every pending control message.
    pub fn process_messages<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(msg) = rx.pop() {
            self.apply(msg);
        }
    }

    pub fn apply(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn => self.note_on(),
            SynthMessage::NoteOff => self.note_off(),
            SynthMessage::SetFrequency(hz) => self.set_frequency(hz),
            SynthMessage::SetTune(semitones) => self.set_tune(semitones),
            SynthMessage::SetFineTune(fraction) => self.set_fine_tune(fraction),
            SynthMessage::SetVertices(vertices) => self.set_vertices(vertices),
            SynthMessage::SetInterpolation(mode) => self.set_interpolation(mode),
            SynthMessage::SetSmoothing(amount) => self.set_smoothing(amount),
            SynthMessage::SetNoteOffTime(fraction) => self.set_note_off_time(fraction),
            SynthMessage::SetSpeakerProtection(enabled) => {
                self.set_speaker_protection_enabled(enabled)
            }
        }
    }

    pub fn set_frequency(&mut self, hz: f32) {
        self.engine.set_frequency(hz);
    }

    pub fn set_tune(&mut self, semitones: i32) {
        self.engine.set_tune(semitones);
    }

    pub fn set_fine_tune(&mut self, fraction: f32) {
        self.engine.set_fine_tune(fraction);
    }

    pub fn set_vertices(&mut self, vertices: VertexSet) {
        self.engine.set_vertices(vertices);
    }

    pub fn set_interpolation(&mut self, mode: InterpolationMode) {
        self.engine.set_interpolation(mode);
    }

    pub fn set_smoothing(&mut self, amount: f32) {
        self.smoother.set_amount(amount);
    }

    pub fn set_note_off_time(&mut self, fraction: f32) {
        self.engine.set_note_off_time(fraction);
    }

    pub fn set_speaker_protection_enabled(&mut self, enabled: bool) {
        self.guard.set_enabled(enabled);
    }

    pub fn is_protection_tripped(&self) -> bool {
        self.guard.is_tripped()
    }

    pub fn is_speaker_protection_enabled(&self) -> bool {
        self.guard.is_enabled()
    }

    /// False once a release has fully faded to silence.
    pub fn is_sounding(&self) -> bool {
        !self.engine.is_idle()
    }

    pub fn smoothing(&self) -> f32 {
        self.smoother.amount()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn engine(&self) -> &WaveformEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WaveformEngine {
        &mut self.engine
    }
}
