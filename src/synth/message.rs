use rtrb::{Consumer, Producer};

/// Identifies one tone from trigger to stop.
pub type ToneId = u64;

/// Commands sent from the control side to the audio side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    /// Strike a tone that rings for `duration` seconds.
    Play {
        id: ToneId,
        frequency: f32,
        duration: f32,
    },
    /// Cut one tone short. Unknown or finished ids are ignored.
    Stop { id: ToneId },
    /// Cut every sounding tone short.
    StopAll,
}

/// Control-side end of the message path.
pub trait ToneSink {
    fn send(&mut self, msg: SynthMessage);
}

/// Audio-side end of the message path.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

impl ToneSink for Producer<SynthMessage> {
    fn send(&mut self, msg: SynthMessage) {
        // A full queue means the audio thread has stalled; dropping is
        // the only option that keeps the control side non-blocking.
        if self.push(msg).is_err() {
            tracing::warn!(?msg, "synth queue full, message dropped");
        }
    }
}

impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}
