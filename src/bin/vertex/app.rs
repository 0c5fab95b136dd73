//! Audio setup: opens the output device and wires the voice to the UI

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use vertex_synth::{synth::SharedVoice, SynthConfig, MAX_BLOCK_SIZE};

use crate::ui::UiApp;

/// Samples buffered for the oscilloscope between UI frames
const SCOPE_RING_SIZE: usize = 8192;

/// Open the default output device, start the stream and run the UI until quit.
pub fn run(config: SynthConfig) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;

    let config = config.with_sample_rate(sample_rate);
    config.validate().wrap_err("invalid synth config")?;
    log::info!(
        target: "audio",
        "output: {sample_rate} Hz, {channels} channels, protection window {} frames",
        config.buffer_size
    );

    let (mut voice, handle) = SharedVoice::new(&config);
    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];
                    voice.render(block);

                    // Mono to all channels; the scope drops samples when the UI lags
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        let start = out_off + i * channels;
                        data[start..start + channels].fill(s);
                        let _ = scope_tx.push(s);
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| log::error!(target: "audio", "stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(handle, scope_rx, &config).run(&mut terminal);
    ratatui::restore();

    drop(stream);
    log::info!(target: "audio", "stream closed");
    result
}
