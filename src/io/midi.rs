/// Channel voice messages the synth understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    /// Centered on zero, -8192..=8191
    PitchBend { channel: u8, value: i16 },
}

impl MidiEvent {
    /// Decode a raw channel message. Returns `None` for messages the voice
    /// has no use for (controllers, program changes, system messages), running
    /// status and truncated input.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        let channel = status & 0x0F;
        let data1 = || data.first().copied().filter(|b| b & 0x80 == 0);
        let data2 = || data.get(1).copied().filter(|b| b & 0x80 == 0);

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data1()?,
                velocity: data2()?,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: data1()?,
                velocity: data2()?,
            }),
            0xE0 => {
                let raw = (data2()? as i16) << 7 | data1()? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                })
            }
            _ => None,
        }
    }
}
