/// Channel voice messages exchanged with the hardware controller.
///
/// Channels are zero-based (`0..=15`), data bytes are 7-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;
const PROGRAM_CHANGE: u8 = 0xC0;
const PITCH_BEND: u8 = 0xE0;

/// Pitch bend center as a 14-bit value.
const PITCH_BEND_CENTER: i16 = 0x2000;

impl MidiEvent {
    /// Decode one raw message.
    ///
    /// A note-on with velocity zero is a note-off, as running-status
    /// controllers commonly send it. Anything that is not a complete channel
    /// voice message of a kind listed above yields `None`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }
        let channel = status & 0x0F;
        let data7 = |i: usize| data.get(i).copied().filter(|b| b & 0x80 == 0);

        match status & 0xF0 {
            NOTE_OFF => Some(MidiEvent::NoteOff {
                channel,
                key: data7(0)?,
                velocity: data7(1)?,
            }),
            NOTE_ON => {
                let key = data7(0)?;
                let velocity = data7(1)?;
                if velocity == 0 {
                    Some(MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity,
                    })
                } else {
                    Some(MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    })
                }
            }
            CONTROL_CHANGE => Some(MidiEvent::ControlChange {
                channel,
                controller: data7(0)?,
                value: data7(1)?,
            }),
            PROGRAM_CHANGE => Some(MidiEvent::ProgramChange {
                channel,
                program: data7(0)?,
            }),
            PITCH_BEND => {
                let lsb = data7(0)? as i16;
                let msb = data7(1)? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - PITCH_BEND_CENTER,
                })
            }
            _ => None,
        }
    }

    /// Encode as raw bytes. Returns the buffer and the number of bytes used.
    pub fn to_bytes(&self) -> ([u8; 3], usize) {
        match *self {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => ([NOTE_ON | (channel & 0x0F), key & 0x7F, velocity & 0x7F], 3),
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => ([NOTE_OFF | (channel & 0x0F), key & 0x7F, velocity & 0x7F], 3),
            MidiEvent::ControlChange {
                channel,
                controller,
                value,
            } => (
                [CONTROL_CHANGE | (channel & 0x0F), controller & 0x7F, value & 0x7F],
                3,
            ),
            MidiEvent::ProgramChange { channel, program } => {
                ([PROGRAM_CHANGE | (channel & 0x0F), program & 0x7F, 0], 2)
            }
            MidiEvent::PitchBend { channel, value } => {
                let raw = (value.clamp(-PITCH_BEND_CENTER, PITCH_BEND_CENTER - 1)
                    + PITCH_BEND_CENTER) as u16;
                (
                    [
                        PITCH_BEND | (channel & 0x0F),
                        (raw & 0x7F) as u8,
                        ((raw >> 7) & 0x7F) as u8,
                    ],
                    3,
                )
            }
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_voice_messages() {
        assert_eq!(
            MidiEvent::parse(&[0x91, 0x0B, 0x7F]),
            Some(MidiEvent::NoteOn {
                channel: 1,
                key: 0x0B,
                velocity: 0x7F
            })
        );
        assert_eq!(
            MidiEvent::parse(&[0xB2, 0x08, 0x40]),
            Some(MidiEvent::ControlChange {
                channel: 2,
                controller: 0x08,
                value: 0x40
            })
        );
        assert_eq!(
            MidiEvent::parse(&[0xE0, 0x00, 0x40]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 0
            })
        );
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        assert_eq!(
            MidiEvent::parse(&[0x91, 0x0B, 0x00]),
            Some(MidiEvent::NoteOff {
                channel: 1,
                key: 0x0B,
                velocity: 0
            })
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(MidiEvent::parse(&[]), None);
        assert_eq!(MidiEvent::parse(&[0x0B, 0x7F]), None); // no status byte
        assert_eq!(MidiEvent::parse(&[0x91, 0x0B]), None); // truncated
        assert_eq!(MidiEvent::parse(&[0x91, 0x8B, 0x10]), None); // data byte with high bit
        assert_eq!(MidiEvent::parse(&[0xF8]), None); // realtime clock
    }

    #[test]
    fn encodes_status_messages() {
        let on = MidiEvent::NoteOn {
            channel: 2,
            key: 0x0C,
            velocity: 0x7F,
        };
        assert_eq!(on.to_bytes(), ([0x92, 0x0C, 0x7F], 3));

        let (bytes, len) = MidiEvent::PitchBend {
            channel: 0,
            value: -8192,
        }
        .to_bytes();
        assert_eq!(&bytes[..len], &[0xE0, 0x00, 0x00]);
    }
}
