//! Keyboard layout
//!
//! Terminals only report key presses, so a piano key plays until another key
//! replaces it or `Space` releases it.

use crossterm::event::KeyCode;

/// Two-row piano layout, one semitone per key
const PIANO_KEYS: &str = "awsedftgyhujkolp";
/// MIDI note of the leftmost piano key (A3)
const PIANO_BASE_NOTE: u8 = 57;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Play(u8),
    Release,
    Tune(i32),
    FineTune(f32),
    CycleInterpolation,
    Smoothing(f32),
    NoteOffTime(f32),
    ToggleProtection,
    SelectNextVertex,
    MoveVertex { phase: f32, amplitude: f32 },
    InsertVertex,
    DeleteVertex,
    Quit,
}

const PHASE_STEP: f32 = 0.01;
const AMPLITUDE_STEP: f32 = 0.05;
const FINE_STEP: f32 = 0.05;
const AMOUNT_STEP: f32 = 0.05;

pub fn map_key(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::Char(c) => {
            if let Some(offset) = PIANO_KEYS.find(c) {
                return Some(KeyAction::Play(PIANO_BASE_NOTE + offset as u8));
            }
            match c {
                ' ' => KeyAction::Release,
                '[' => KeyAction::Tune(-1),
                ']' => KeyAction::Tune(1),
                '-' => KeyAction::FineTune(-FINE_STEP),
                '=' => KeyAction::FineTune(FINE_STEP),
                'm' => KeyAction::CycleInterpolation,
                ',' => KeyAction::Smoothing(-AMOUNT_STEP),
                '.' => KeyAction::Smoothing(AMOUNT_STEP),
                ';' => KeyAction::NoteOffTime(-AMOUNT_STEP),
                '\'' => KeyAction::NoteOffTime(AMOUNT_STEP),
                'x' => KeyAction::ToggleProtection,
                'n' => KeyAction::InsertVertex,
                'q' | 'Q' => KeyAction::Quit,
                _ => return None,
            }
        }
        KeyCode::Tab => KeyAction::SelectNextVertex,
        KeyCode::Left => KeyAction::MoveVertex {
            phase: -PHASE_STEP,
            amplitude: 0.0,
        },
        KeyCode::Right => KeyAction::MoveVertex {
            phase: PHASE_STEP,
            amplitude: 0.0,
        },
        KeyCode::Up => KeyAction::MoveVertex {
            phase: 0.0,
            amplitude: AMPLITUDE_STEP,
        },
        KeyCode::Down => KeyAction::MoveVertex {
            phase: 0.0,
            amplitude: -AMPLITUDE_STEP,
        },
        KeyCode::Backspace | KeyCode::Delete => KeyAction::DeleteVertex,
        KeyCode::Esc => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}
