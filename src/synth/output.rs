//! Lazily-opened audio output.
//!
//! Audio devices are opened on the first game start, not at program
//! launch. Until then (or forever, if opening fails) every trigger is a
//! silent no-op and the game carries on without sound.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::AudioResult;
use crate::synth::message::{SynthMessage, ToneSink};

/// Something that can produce a [`ToneSink`] on demand.
pub trait OutputBackend {
    fn open(&mut self) -> AudioResult<Box<dyn ToneSink>>;

    /// Short label used in log lines.
    fn name(&self) -> &str {
        "audio"
    }
}

pub struct AudioOutput {
    backend: Option<Box<dyn OutputBackend>>,
    sink: Option<Box<dyn ToneSink>>,
    attempted: bool,
}

impl AudioOutput {
    pub fn new(backend: impl OutputBackend + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
            sink: None,
            attempted: false,
        }
    }

    /// An output that never produces sound.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            sink: None,
            attempted: false,
        }
    }

    /// Open the backend on the first call; later calls are no-ops.
    ///
    /// A failed open is logged once and not retried.
    pub fn initialize(&mut self) -> bool {
        if self.attempted {
            return self.sink.is_some();
        }
        self.attempted = true;

        let Some(backend) = self.backend.as_mut() else {
            debug!("audio output disabled, continuing without sound");
            return false;
        };

        match backend.open() {
            Ok(sink) => {
                info!(backend = backend.name(), "audio output initialized");
                self.sink = Some(sink);
                true
            }
            Err(err) => {
                warn!(backend = backend.name(), %err, "audio unavailable, continuing without sound");
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sink.is_some()
    }

    /// Forward a message to the audio side. Returns false when there is no
    /// open output and the message was dropped.
    pub fn send(&mut self, msg: SynthMessage) -> bool {
        match self.sink.as_mut() {
            Some(sink) => {
                sink.send(msg);
                true
            }
            None => false,
        }
    }
}

/// Backend that records every message instead of producing sound.
///
/// Clones share the same log, so a caller can keep one copy for inspection
/// while the game owns the other.
#[derive(Clone, Default)]
pub struct CaptureBackend {
    log: Rc<RefCell<Vec<SynthMessage>>>,
    opens: Rc<Cell<usize>>,
}

struct CaptureSink {
    log: Rc<RefCell<Vec<SynthMessage>>>,
}

impl ToneSink for CaptureSink {
    fn send(&mut self, msg: SynthMessage) {
        self.log.borrow_mut().push(msg);
    }
}

impl CaptureBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message sent so far, oldest first.
    pub fn messages(&self) -> Vec<SynthMessage> {
        self.log.borrow().clone()
    }

    /// Frequencies of every `Play` message so far.
    pub fn played_frequencies(&self) -> Vec<f32> {
        self.log
            .borrow()
            .iter()
            .filter_map(|m| match m {
                SynthMessage::Play { frequency, .. } => Some(*frequency),
                _ => None,
            })
            .collect()
    }

    /// How many times the backend was opened.
    pub fn opens(&self) -> usize {
        self.opens.get()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl OutputBackend for CaptureBackend {
    fn open(&mut self) -> AudioResult<Box<dyn ToneSink>> {
        self.opens.set(self.opens.get() + 1);
        Ok(Box::new(CaptureSink {
            log: Rc::clone(&self.log),
        }))
    }

    fn name(&self) -> &str {
        "capture"
    }
}
