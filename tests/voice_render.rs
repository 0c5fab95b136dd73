use vertex_synth::{
    dsp::{InterpolationMode, VertexSet},
    io::{MidiEvent, MonoKeyTracker},
    synth::{SharedVoice, Voice},
    SynthConfig,
};

fn max_step(samples: &[f32]) -> f32 {
    samples
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f32::max)
}

#[test]
fn default_voice_plays_a_hundred_sample_triangle() {
    let mut voice = Voice::new(&SynthConfig::default());
    voice.note_on();
    let out = voice.render_buffer(500);

    assert_eq!(out[0], 0.0);
    assert!((out[25] - 0.5).abs() < 1e-6);
    assert!((out[75] + 0.5).abs() < 1e-6);
    for i in 100..400 {
        assert!((out[i] - out[i + 100]).abs() < 1e-5, "not periodic at {i}");
    }
    assert!(out.iter().all(|s| (-0.5..=0.5).contains(s)));
}

#[test]
fn note_off_fades_to_exact_silence_until_next_note_on() {
    let mut voice = Voice::new(&SynthConfig::default().with_note_off_time(0.25));
    voice.note_on();
    voice.render_buffer(130);
    voice.note_off();

    // Current segment (at most one period) plus a quarter-period fade
    let fade = voice.render_buffer(200);
    assert_eq!(*fade.last().unwrap(), 0.0);
    assert!(!voice.is_sounding());
    assert!(voice.render_buffer(1_000).iter().all(|&s| s == 0.0));

    voice.note_on();
    assert!(voice.render_buffer(100).iter().any(|&s| s != 0.0));
}

#[test]
fn retune_mid_note_has_no_discontinuity() {
    let mut voice = Voice::new(&SynthConfig::default());
    voice.note_on();
    let mut out = voice.render_buffer(40);
    voice.set_frequency(660.0);
    out.extend(voice.render_buffer(300));
    voice.set_tune(-7);
    out.extend(voice.render_buffer(300));

    // Steepest linear slope at 660 Hz is a full swing over ~33 samples
    assert!(max_step(&out) <= 1.0 / 33.0 + 1e-4);
}

#[test]
fn every_mode_stays_in_range() {
    let shape = VertexSet::from_points(&[
        (0.0, -1.0),
        (0.05, 1.0),
        (0.2, -0.3),
        (0.21, 0.95),
        (0.7, -1.0),
    ])
    .unwrap();

    for mode in InterpolationMode::ALL {
        for smoothing in [0.0, 0.5, 1.0] {
            let config = SynthConfig::default()
                .with_interpolation(mode)
                .with_smoothing(smoothing)
                .with_frequency(1_234.5);
            let mut voice = Voice::new(&config);
            voice.set_vertices(shape);
            voice.note_on();
            let out = voice.render_buffer(4_096);
            assert!(
                out.iter().all(|s| s.is_finite() && s.abs() <= 1.0),
                "{mode:?} with smoothing {smoothing} left [-1, 1]"
            );
        }
    }
}

#[test]
fn single_zero_vertex_is_silent() {
    let mut voice = Voice::new(&SynthConfig::default());
    voice.set_vertices(VertexSet::from_points(&[(0.0, 0.0)]).unwrap());
    voice.note_on();
    assert!(voice.render_buffer(10_000).iter().all(|&s| s == 0.0));
}

#[test]
fn shared_voice_trips_on_dc_and_recovers_on_note_on() {
    let config = SynthConfig::default().with_buffer_size(128);
    let (mut voice, mut handle) = SharedVoice::new(&config);
    handle.set_vertices(VertexSet::from_points(&[(0.0, 1.0), (0.5, 1.0)]).unwrap());
    handle.note_on();

    let mut data = vec![0.0f32; 128 * 2];
    for _ in 0..6 {
        voice.render_interleaved(&mut data, 2);
    }
    assert!(handle.is_protection_tripped());

    // Tripping releases the voice; it fades out like a normal note-off
    for _ in 0..4 {
        voice.render_interleaved(&mut data, 2);
    }
    assert!(data.iter().all(|&s| s == 0.0));
    assert!(!handle.is_sounding());
    assert!(handle.is_protection_tripped());

    handle.set_vertices(VertexSet::default());
    handle.note_on();
    voice.render_interleaved(&mut data, 2);
    assert!(!handle.is_protection_tripped());
    assert!(handle.is_sounding());
}

#[test]
fn alternating_output_never_trips() {
    let config = SynthConfig::default().with_buffer_size(64);
    let (mut voice, mut handle) = SharedVoice::new(&config);
    handle.note_on();

    let mut data = vec![0.0f32; 64];
    for _ in 0..1_000 {
        voice.render(&mut data);
    }
    assert!(!handle.is_protection_tripped());
    assert!(handle.is_sounding());
}

#[test]
fn midi_keys_drive_the_shared_voice() {
    let (mut voice, mut handle) = SharedVoice::new(&SynthConfig::default());
    let mut tracker = MonoKeyTracker::new(0);
    let mut buf = [0.0f32; 64];

    let press = MidiEvent::from_bytes(&[0x90, 81, 100]).unwrap();
    tracker.handle(press).for_each(|msg| handle.push(msg));
    voice.render(&mut buf);
    assert!((voice.voice().engine().frequency() - 880.0).abs() < 1e-2);
    assert!(handle.is_sounding());

    // Full downward bend is one semitone of fine tune
    let bend = MidiEvent::from_bytes(&[0xE0, 0x00, 0x00]).unwrap();
    tracker.handle(bend).for_each(|msg| handle.push(msg));
    voice.render(&mut buf);
    let expected = 880.0 * 2.0_f32.powf(-1.0 / 12.0);
    assert!((voice.voice().engine().tuned_frequency() - expected).abs() < 1e-2);

    // Velocity zero is a release
    let release = MidiEvent::from_bytes(&[0x90, 81, 0]).unwrap();
    tracker.handle(release).for_each(|msg| handle.push(msg));
    voice.render(&mut buf);
    assert!(voice.voice().engine().is_released());
}

#[cfg(feature = "serde")]
#[test]
fn toml_config_builds_a_voice() {
    let config = SynthConfig::from_toml_str(
        r#"
        frequency = 220.0
        tune = 12
        interpolation = "spike"
        smoothing = 0.3
        "#,
    )
    .unwrap();

    let voice = Voice::new(&config);
    let engine = voice.engine();
    assert!((engine.tuned_frequency() - 440.0).abs() < 1e-2);
    assert_eq!(engine.interpolation(), InterpolationMode::Spike);
    assert_eq!(voice.smoothing(), 0.3);
}
