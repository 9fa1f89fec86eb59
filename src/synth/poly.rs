use crate::{
    synth::{
        message::{MessageReceiver, SynthMessage},
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/// Polyphonic renderer that lives on the audio thread.
///
/// Drains control messages at the top of every block, then sums all active
/// voices. Output is clamped to [-1, 1]; a handful of overlapping tones at
/// these gains stays well inside that range.
pub struct PianoSynth<R: MessageReceiver> {
    voices: Vec<Voice>,
    rx: R,
    temp_buffer: Vec<f32>,
    frame_counter: u64,
}

impl<R: MessageReceiver> PianoSynth<R> {
    pub fn new(sample_rate: f32, max_voices: usize, rx: R) -> Self {
        let voices = (0..max_voices.max(1))
            .map(|_| Voice::new(sample_rate))
            .collect();

        Self {
            voices,
            rx,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
        }
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        // Process control messages
        while let Some(msg) = self.rx.pop() {
            match msg {
                SynthMessage::Play {
                    id,
                    frequency,
                    duration,
                } => {
                    let age = self.frame_counter;
                    let voice = self.allocate_voice();
                    voice.start(id, frequency, duration, age);
                }
                SynthMessage::Stop { id } => {
                    if let Some(voice) = self.find_voice(id) {
                        voice.stop();
                    }
                }
                SynthMessage::StopAll => {
                    for voice in &mut self.voices {
                        voice.stop();
                    }
                }
            }
        }

        out.fill(0.0);
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let scratch = &mut self.temp_buffer[..chunk.len()];
            scratch.fill(0.0);
            for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
                voice.render_add(scratch);
            }
            for (o, s) in chunk.iter_mut().zip(scratch.iter()) {
                *o = s.clamp(-1.0, 1.0);
            }
        }

        self.frame_counter += out.len() as u64;
    }

    /// Number of voices currently sounding.
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    fn allocate_voice(&mut self) -> &mut Voice {
        // First choice: a free voice. Otherwise steal the oldest one.
        let idx = self
            .voices
            .iter()
            .position(|v| v.is_free())
            .or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, v)| v.age())
                    .map(|(idx, _)| idx)
            })
            .unwrap_or(0);

        &mut self.voices[idx]
    }

    fn find_voice(&mut self, id: u64) -> Option<&mut Voice> {
        self.voices
            .iter_mut()
            .find(|v| v.id() == id && v.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn silent_without_messages() {
        let (_tx, rx) = RingBuffer::<SynthMessage>::new(8);
        let mut synth = PianoSynth::new(SAMPLE_RATE, 4, rx);
        let mut buffer = vec![1.0; 256];
        synth.render_block(&mut buffer);
        assert_eq!(peak(&buffer), 0.0);
    }

    #[test]
    fn play_sounds_and_ends_naturally() {
        let (mut tx, rx) = RingBuffer::<SynthMessage>::new(8);
        let mut synth = PianoSynth::new(SAMPLE_RATE, 4, rx);
        let _ = tx.push(SynthMessage::Play {
            id: 1,
            frequency: 261.63,
            duration: 0.05,
        });

        let mut buffer = vec![0.0; 1024];
        synth.render_block(&mut buffer);
        assert!(peak(&buffer) > 0.1);
        assert_eq!(synth.active_voices(), 1);

        // 0.05s = 2400 samples; three more blocks runs past the end.
        for _ in 0..3 {
            synth.render_block(&mut buffer);
        }
        assert_eq!(synth.active_voices(), 0);
        assert_eq!(peak(&buffer), 0.0);
    }

    #[test]
    fn stop_all_silences_every_voice() {
        let (mut tx, rx) = RingBuffer::<SynthMessage>::new(8);
        let mut synth = PianoSynth::new(SAMPLE_RATE, 4, rx);
        for (id, frequency) in [(1, 261.63), (2, 329.63), (3, 392.0)] {
            let _ = tx.push(SynthMessage::Play {
                id,
                frequency,
                duration: 2.0,
            });
        }
        let mut buffer = vec![0.0; 512];
        synth.render_block(&mut buffer);
        assert_eq!(synth.active_voices(), 3);

        let _ = tx.push(SynthMessage::StopAll);
        synth.render_block(&mut buffer);
        synth.render_block(&mut buffer);
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn stop_of_unknown_id_is_ignored() {
        let (mut tx, rx) = RingBuffer::<SynthMessage>::new(8);
        let mut synth = PianoSynth::new(SAMPLE_RATE, 2, rx);
        let _ = tx.push(SynthMessage::Play {
            id: 5,
            frequency: 440.0,
            duration: 1.0,
        });
        let _ = tx.push(SynthMessage::Stop { id: 99 });
        let mut buffer = vec![0.0; 512];
        synth.render_block(&mut buffer);
        assert_eq!(synth.active_voices(), 1);
    }

    #[test]
    fn steals_oldest_voice_when_full() {
        let (mut tx, rx) = RingBuffer::<SynthMessage>::new(8);
        let mut synth = PianoSynth::new(SAMPLE_RATE, 2, rx);
        let mut buffer = vec![0.0; 64];
        for id in 1..=3 {
            let _ = tx.push(SynthMessage::Play {
                id,
                frequency: 440.0,
                duration: 1.0,
            });
            synth.render_block(&mut buffer);
        }
        assert_eq!(synth.active_voices(), 2);

        // Voice 1 was stolen, so stopping it changes nothing.
        let _ = tx.push(SynthMessage::Stop { id: 1 });
        synth.render_block(&mut buffer);
        assert_eq!(synth.active_voices(), 2);
    }
}
