use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Most keys that can be held at once; further presses are ignored.
const MAX_HELD_KEYS: usize = 16;

const BEND_CENTER: f32 = 8192.0;

/// Up to two messages produced by a single key event, in order.
pub type KeyMessages = [Option<SynthMessage>; 2];

/*
Monophonic key handling
-----------------------

The synth has one voice, but a player holds several keys. The tracker keeps
a stack of held keys with last-note priority:

  press C        → C sounds
  press E        → E sounds (C still held)
  release E      → back to C, retriggered
  release C      → note off

A key that is already held is ignored on a second press, so a stuck
controller cannot grow the stack.
*/

/// Converts key presses on one MIDI channel into voice messages.
#[derive(Debug, Clone)]
pub struct MonoKeyTracker {
    channel: u8,
    held: [u8; MAX_HELD_KEYS],
    len: usize,
}

impl MonoKeyTracker {
    pub fn new(channel: u8) -> Self {
        Self {
            channel,
            held: [0; MAX_HELD_KEYS],
            len: 0,
        }
    }

    pub fn set_channel(&mut self, channel: u8) {
        self.channel = channel;
    }

    /// The currently sounding key, if any.
    pub fn active_key(&self) -> Option<u8> {
        self.len.checked_sub(1).map(|top| self.held[top])
    }

    pub fn held_keys(&self) -> &[u8] {
        &self.held[..self.len]
    }

    /// Feed one event. Returns messages to forward to the voice, in order.
    pub fn handle(&mut self, event: MidiEvent) -> impl Iterator<Item = SynthMessage> {
        let messages = match event {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } if channel == self.channel => {
                if velocity == 0 {
                    self.key_up(key)
                } else {
                    self.key_down(key)
                }
            }
            MidiEvent::NoteOff { channel, key, .. } if channel == self.channel => self.key_up(key),
            MidiEvent::PitchBend { channel, value } if channel == self.channel => {
                [Some(SynthMessage::SetFineTune(bend_to_fine_tune(value))), None]
            }
            _ => [None, None],
        };
        messages.into_iter().flatten()
    }

    pub fn key_down(&mut self, key: u8) -> KeyMessages {
        if self.held_keys().contains(&key) || self.len == MAX_HELD_KEYS {
            return [None, None];
        }
        self.held[self.len] = key;
        self.len += 1;
        sound(key)
    }

    pub fn key_up(&mut self, key: u8) -> KeyMessages {
        let Some(pos) = self.held_keys().iter().position(|&k| k == key) else {
            return [None, None];
        };
        self.held.copy_within(pos + 1..self.len, pos);
        self.len -= 1;

        match self.active_key() {
            Some(previous) => sound(previous),
            None => [Some(SynthMessage::NoteOff), None],
        }
    }

    /// Forget every held key without producing a message.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Forget every held key and silence the voice.
    pub fn all_off(&mut self) -> SynthMessage {
        self.clear();
        SynthMessage::NoteOff
    }
}

fn sound(key: u8) -> KeyMessages {
    [
        Some(SynthMessage::SetFrequency(midi_note_to_freq(key))),
        Some(SynthMessage::NoteOn),
    ]
}

/// Full pitch-bend travel spans one semitone either way, the range of fine tune.
fn bend_to_fine_tune(value: i16) -> f32 {
    (value as f32 / BEND_CENTER).clamp(-1.0, 1.0)
}

/// Equal temperament, A4 = MIDI 69 = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
