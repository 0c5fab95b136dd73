//! TUI module for vertex
//!
//! Plays the voice from the computer keyboard, edits the vertex shape and
//! shows the output in real time.

mod controls;
mod keys;
mod scope;
mod shape;
pub mod state;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use vertex_synth::{
    io::{midi_note_to_freq, MonoKeyTracker},
    synth::VoiceHandle,
    SynthConfig,
};

pub use state::ControlState;

use controls::{render_controls, AudioStats, VoiceFlags};
use keys::{map_key, KeyAction};
use scope::render_scope;
use shape::render_shape;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

const HELP: &str = " [a..p] Play  [Space] Release  [[ ]] Tune  [- =] Fine  [m] Mode  \
[, .] Smooth  [; '] Note-off  [x] Protect  [Tab] Select  [←→↑↓] Move  [n] Insert  \
[⌫] Delete  [q] Quit";

pub struct UiApp {
    handle: VoiceHandle,
    tracker: MonoKeyTracker,
    controls: ControlState,
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    flags: VoiceFlags,
    should_quit: bool,
}

impl UiApp {
    pub fn new(handle: VoiceHandle, audio_rx: Consumer<f32>, config: &SynthConfig) -> Self {
        Self {
            handle,
            tracker: MonoKeyTracker::new(0),
            controls: ControlState::from_config(config),
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            flags: VoiceFlags::default(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_status();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        // Let the voice fade out instead of cutting off with the stream
        self.handle.push(self.tracker.all_off());
        Ok(())
    }

    /// Pull new samples from the ring, keeping the last VIS_BUFFER_SIZE
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received && self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn poll_status(&mut self) {
        let tripped = self.handle.is_protection_tripped();
        if tripped && !self.flags.protection_tripped {
            log::warn!(
                target: "ui",
                "speaker protection tripped: one-sided output for {} frames, voice released",
                self.handle.status().frames_rendered()
            );
        }
        self.flags = VoiceFlags {
            sounding: self.handle.is_sounding(),
            protection_tripped: tripped,
        };
    }

    fn handle_key(&mut self, code: KeyCode) {
        let Some(action) = map_key(code) else {
            return;
        };

        match action {
            KeyAction::Play(note) => {
                // No key-up events: every press replaces the held key
                self.tracker.clear();
                for msg in self.tracker.key_down(note).into_iter().flatten() {
                    self.handle.push(msg);
                }
                self.controls.frequency = midi_note_to_freq(note);
                self.controls.active_note = Some(note);
                log::debug!(target: "ui", "play note {note}");
            }
            KeyAction::Release => {
                self.handle.push(self.tracker.all_off());
                self.controls.active_note = None;
            }
            KeyAction::Tune(delta) => {
                self.controls.adjust_tune(delta);
                self.handle.set_tune(self.controls.tune);
            }
            KeyAction::FineTune(delta) => {
                self.controls.adjust_fine_tune(delta);
                self.handle.set_fine_tune(self.controls.fine_tune);
            }
            KeyAction::CycleInterpolation => {
                self.controls.cycle_interpolation();
                self.handle.set_interpolation(self.controls.interpolation);
                log::debug!(target: "ui", "interpolation {}", self.controls.interpolation.name());
            }
            KeyAction::Smoothing(delta) => {
                self.controls.adjust_smoothing(delta);
                self.handle.set_smoothing(self.controls.smoothing);
            }
            KeyAction::NoteOffTime(delta) => {
                self.controls.adjust_note_off_time(delta);
                self.handle.set_note_off_time(self.controls.note_off_time);
            }
            KeyAction::ToggleProtection => {
                self.controls.toggle_protection();
                self.handle
                    .set_speaker_protection_enabled(self.controls.speaker_protection);
                log::info!(
                    target: "ui",
                    "speaker protection {}",
                    if self.controls.speaker_protection { "enabled" } else { "disabled" }
                );
            }
            KeyAction::SelectNextVertex => self.controls.select_next(),
            KeyAction::MoveVertex { phase, amplitude } => {
                if self.controls.move_selected(phase, amplitude) {
                    self.send_vertices();
                }
            }
            KeyAction::InsertVertex => {
                if self.controls.insert_after_selected() {
                    self.send_vertices();
                }
            }
            KeyAction::DeleteVertex => {
                if self.controls.delete_selected() {
                    self.send_vertices();
                }
            }
            KeyAction::Quit => self.should_quit = true,
        }
    }

    fn send_vertices(&mut self) {
        let vertices = self.controls.vertices;
        if !vertices.has_zero_crossing() {
            log::debug!(target: "ui", "shape has no zero crossing");
        }
        self.handle.set_vertices(vertices);
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: views, parameter panel, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Scope and shape
                Constraint::Length(4), // Parameters
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let views = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);

        render_scope(frame, views[0], &self.audio_buffer);
        render_shape(
            frame,
            views[1],
            &self.controls.vertices,
            self.controls.selected,
            self.controls.interpolation,
        );

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_controls(frame, chunks[1], &self.controls, self.flags, &stats);

        let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
