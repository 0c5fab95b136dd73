// Purpose - external input surfaces, format conversions

pub mod converter;
pub mod midi;

pub use converter::{midi_note_to_freq, MonoKeyTracker};
pub use midi::MidiEvent;
