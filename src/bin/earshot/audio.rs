//! cpal output backend.
//!
//! Opening builds the default output stream with a [`PianoSynth`] inside
//! its callback. Tones reach it over an rtrb queue; rendered samples are
//! copied onto a second queue for the on-screen scope.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Producer, RingBuffer};
use tracing::{error, info};

use earshot::{
    error::{AudioError, AudioResult},
    synth::{PianoSynth, SynthMessage, ToneSink},
    OutputBackend, MAX_BLOCK_SIZE,
};

const MESSAGE_CAPACITY: usize = 256;
const MAX_VOICES: usize = 16;

pub struct CpalBackend {
    scope: Option<Producer<f32>>,
}

impl CpalBackend {
    /// `scope` receives every rendered (mono) sample, best effort.
    pub fn new(scope: Producer<f32>) -> Self {
        Self { scope: Some(scope) }
    }
}

/// Keeps the stream alive for as long as the game holds the sink.
struct CpalSink {
    tx: Producer<SynthMessage>,
    _stream: cpal::Stream,
}

impl ToneSink for CpalSink {
    fn send(&mut self, msg: SynthMessage) {
        self.tx.send(msg);
    }
}

impl OutputBackend for CpalBackend {
    fn open(&mut self) -> AudioResult<Box<dyn ToneSink>> {
        let mut scope = self.scope.take().ok_or(AudioError::AlreadyOpened)?;

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config = device
            .default_output_config()
            .map_err(|err| AudioError::Config(err.to_string()))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate,
            channels,
            "opening audio output"
        );

        let (tx, rx) = RingBuffer::<SynthMessage>::new(MESSAGE_CAPACITY);
        let mut synth = PianoSynth::new(sample_rate, MAX_VOICES, rx);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames];
                        synth.render_block(block);

                        // Mono to all channels
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            let frame = out_off + i * channels;
                            data[frame..frame + channels].fill(s);
                            let _ = scope.push(s);
                        }
                        frames_written += frames;
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .map_err(|err| AudioError::BuildStream(err.to_string()))?;

        stream
            .play()
            .map_err(|err| AudioError::PlayStream(err.to_string()))?;

        Ok(Box::new(CpalSink {
            tx,
            _stream: stream,
        }))
    }

    fn name(&self) -> &str {
        "cpal"
    }
}
