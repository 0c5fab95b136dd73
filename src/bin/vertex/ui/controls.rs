//! Parameter panel - tuning, shaping, protection and output level

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::ControlState;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Status read back from the audio thread
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceFlags {
    pub sounding: bool,
    pub protection_tripped: bool,
}

pub fn render_controls(
    frame: &mut Frame,
    area: Rect,
    state: &ControlState,
    flags: VoiceFlags,
    stats: &AudioStats,
) {
    let block = Block::default().title(" vertex ").borders(Borders::ALL);

    let note = match state.active_note {
        Some(n) => format!("note {n}  "),
        None => "no note  ".to_string(),
    };
    let (voice_label, voice_color) = if flags.sounding {
        ("▶ sounding  ", Color::Green)
    } else {
        ("■ idle  ", Color::DarkGray)
    };

    let tuning = Line::from(vec![
        Span::styled(voice_label, Style::default().fg(voice_color)),
        Span::styled(note, Style::default().fg(Color::White)),
        Span::styled(
            format!(
                "{:.1} Hz → {:.1} Hz  ",
                state.frequency,
                state.tuned_frequency()
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("tune {:+} st  fine {:+.2}  ", state.tune, state.fine_tune),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz", state.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let protection = if !state.speaker_protection {
        Span::styled("protection OFF  ", Style::default().fg(Color::Yellow))
    } else if flags.protection_tripped {
        Span::styled(
            "PROTECTION TRIPPED  ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("protection ok  ", Style::default().fg(Color::Green))
    };

    let shaping = Line::from(vec![
        Span::styled(
            format!("mode {}  ", state.interpolation.name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!(
                "smooth {:.2}  note-off {:.2}  ",
                state.smoothing, state.note_off_time
            ),
            Style::default().fg(Color::White),
        ),
        protection,
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(vec![tuning, shaping]).block(block);
    frame.render_widget(paragraph, area);
}
