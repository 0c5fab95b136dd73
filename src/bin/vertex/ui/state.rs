//! UI-side mirror of the voice parameters
//!
//! The voice lives on the audio thread, so the UI keeps its own copy of every
//! parameter it displays and edits. Each edit updates the copy and the caller
//! forwards the new value through the voice handle.

use vertex_synth::{
    dsp::{Amplitude, InterpolationMode, Phase, Vertex, VertexSet},
    SynthConfig,
};

const TUNE_RANGE: i32 = 48;
const MIN_NOTE_OFF_TIME: f32 = 0.05;
/// The editor never deletes below this many vertices
const MIN_EDIT_VERTICES: usize = 2;

#[derive(Debug, Clone)]
pub struct ControlState {
    pub sample_rate: f32,
    pub frequency: f32,
    pub tune: i32,
    pub fine_tune: f32,
    pub interpolation: InterpolationMode,
    pub smoothing: f32,
    pub note_off_time: f32,
    pub speaker_protection: bool,
    pub vertices: VertexSet,
    pub selected: usize,
    pub active_note: Option<u8>,
}

impl ControlState {
    pub fn from_config(config: &SynthConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            frequency: config.frequency,
            tune: config.tune,
            fine_tune: config.fine_tune,
            interpolation: config.interpolation,
            smoothing: config.smoothing,
            note_off_time: config.note_off_time,
            speaker_protection: config.speaker_protection,
            vertices: VertexSet::default(),
            selected: 0,
            active_note: None,
        }
    }

    pub fn tuned_frequency(&self) -> f32 {
        self.frequency * 2.0_f32.powf((self.tune as f32 + self.fine_tune) / 12.0)
    }

    pub fn adjust_tune(&mut self, delta: i32) {
        self.tune = (self.tune + delta).clamp(-TUNE_RANGE, TUNE_RANGE);
    }

    pub fn adjust_fine_tune(&mut self, delta: f32) {
        self.fine_tune = (self.fine_tune + delta).clamp(-1.0, 1.0);
    }

    pub fn adjust_smoothing(&mut self, delta: f32) {
        self.smoothing = (self.smoothing + delta).clamp(0.0, 1.0);
    }

    pub fn adjust_note_off_time(&mut self, delta: f32) {
        self.note_off_time = (self.note_off_time + delta).clamp(MIN_NOTE_OFF_TIME, 1.0);
    }

    pub fn cycle_interpolation(&mut self) {
        self.interpolation = self.interpolation.next();
    }

    pub fn toggle_protection(&mut self) {
        self.speaker_protection = !self.speaker_protection;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.vertices.len();
    }

    pub fn selected_vertex(&self) -> Option<&Vertex> {
        self.vertices.get(self.selected)
    }

    /// Move the selected vertex, saturating at the phase/amplitude bounds.
    /// The selection follows the vertex if the move reorders the set.
    pub fn move_selected(&mut self, d_phase: f32, d_amplitude: f32) -> bool {
        let Some(current) = self.selected_vertex() else {
            return false;
        };
        let moved = Vertex::new(
            Phase::clamped(current.phase() + d_phase),
            Amplitude::clamped(current.amplitude() + d_amplitude),
        );
        match self.vertices.replace(self.selected, moved) {
            Ok(index) => {
                self.selected = index;
                true
            }
            Err(_) => false,
        }
    }

    /// Insert a vertex halfway between the selection and the vertex after it,
    /// wrapping past the end of the cycle. The new vertex becomes selected.
    pub fn insert_after_selected(&mut self) -> bool {
        let len = self.vertices.len();
        let (Some(current), Some(next)) = (
            self.vertices.get(self.selected).copied(),
            self.vertices.get((self.selected + 1) % len).copied(),
        ) else {
            return false;
        };

        let next_phase = if self.selected + 1 == len {
            next.phase() + 1.0
        } else {
            next.phase()
        };
        let mut phase = (current.phase() + next_phase) / 2.0;
        if phase >= 1.0 {
            phase -= 1.0;
        }
        let amplitude = (current.amplitude() + next.amplitude()) / 2.0;

        match self
            .vertices
            .push(Vertex::new(Phase::clamped(phase), Amplitude::clamped(amplitude)))
        {
            Ok(index) => {
                self.selected = index;
                true
            }
            Err(_) => false,
        }
    }

    pub fn delete_selected(&mut self) -> bool {
        if self.vertices.len() <= MIN_EDIT_VERTICES {
            return false;
        }
        if self.vertices.remove(self.selected).is_err() {
            return false;
        }
        self.selected %= self.vertices.len();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ControlState {
        ControlState::from_config(&SynthConfig::default())
    }

    fn phases(state: &ControlState) -> Vec<f32> {
        state.vertices.iter().map(|v| v.phase()).collect()
    }

    #[test]
    fn insert_splits_the_gap_after_the_selection() {
        let mut s = state();
        assert!(s.insert_after_selected());
        assert_eq!(phases(&s), vec![0.25, 0.5, 0.75]);
        assert_eq!(s.selected, 1);
        assert_eq!(s.vertices.get(1).unwrap().amplitude(), 0.0);
    }

    #[test]
    fn insert_after_last_wraps_into_the_next_cycle() {
        let mut s = state();
        s.selected = 1;
        assert!(s.insert_after_selected());
        // Midpoint of 0.75 and 1.25
        assert_eq!(phases(&s), vec![0.0, 0.25, 0.75]);
        assert_eq!(s.selected, 0);
    }

    #[test]
    fn delete_keeps_at_least_two_vertices() {
        let mut s = state();
        assert!(!s.delete_selected());
        assert_eq!(s.vertices.len(), 2);

        s.insert_after_selected();
        s.selected = 2;
        assert!(s.delete_selected());
        assert_eq!(s.vertices.len(), 2);
        assert_eq!(s.selected, 0);
    }

    #[test]
    fn moving_past_a_neighbour_keeps_the_selection_on_the_vertex() {
        let mut s = state();
        for _ in 0..60 {
            s.move_selected(0.01, 0.0);
        }
        let selected = s.selected_vertex().unwrap();
        assert!((selected.phase() - 0.85).abs() < 1e-4);
        assert_eq!(selected.amplitude(), 0.5);
        assert_eq!(s.selected, 1);
    }

    #[test]
    fn moves_saturate_at_the_bounds() {
        let mut s = state();
        for _ in 0..100 {
            s.move_selected(-0.01, 0.05);
        }
        let v = s.selected_vertex().unwrap();
        assert_eq!(v.phase(), 0.0);
        assert_eq!(v.amplitude(), 1.0);
    }

    #[test]
    fn parameter_adjustments_are_clamped() {
        let mut s = state();
        for _ in 0..100 {
            s.adjust_tune(1);
            s.adjust_fine_tune(-0.05);
            s.adjust_smoothing(0.05);
            s.adjust_note_off_time(-0.05);
        }
        assert_eq!(s.tune, TUNE_RANGE);
        assert_eq!(s.fine_tune, -1.0);
        assert_eq!(s.smoothing, 1.0);
        assert_eq!(s.note_off_time, MIN_NOTE_OFF_TIME);
    }
}
