//! Guess sources: on-screen keys and the external button device.
//!
//! Both end up as a call to [`Game::guess`]. The button device reports a
//! channel number per press; channels 2 through 8 map to C through B.
//!
//!   channel  2  3  4  5  6  7  8
//!   pitch    C  D  E  F  G  A  B
//!
//! A device press always sounds its pitch, even when no guess is possible
//! (passive feedback). It only becomes a guess while the game awaits one and
//! the pitch is usable in the current profile. Unmapped channels are dropped.

pub mod device;

use tracing::debug;

use crate::game::machine::Game;
use crate::sequencing::pitch::Pitch;

/// One press reported by the button device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSignal {
    pub channel: u32,
}

/// What became of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Forwarded to the game as a guess.
    Guessed(Pitch),
    /// Sounded (device only) but not a guess right now.
    Sounded(Pitch),
    /// Dropped entirely.
    Ignored,
}

/// Pitch wired to a device channel.
pub fn pitch_for_channel(channel: u32) -> Option<Pitch> {
    match channel {
        2 => Some(Pitch::C),
        3 => Some(Pitch::D),
        4 => Some(Pitch::E),
        5 => Some(Pitch::F),
        6 => Some(Pitch::G),
        7 => Some(Pitch::A),
        8 => Some(Pitch::B),
        _ => None,
    }
}

/// Parse one device line: a decimal channel number, surrounding
/// whitespace (including `\r`) allowed.
pub fn parse_line(line: &str) -> Option<DeviceSignal> {
    line.trim()
        .parse::<u32>()
        .ok()
        .map(|channel| DeviceSignal { channel })
}

/// Key press on an on-screen pitch control.
///
/// Keys are disabled outside `AwaitingGuess`, so a press there does
/// nothing. An accepted press sounds the key and submits the guess.
pub fn key_press(game: &mut Game, pitch: Pitch) -> InputResult {
    if !game.snapshot().keys_enabled {
        return InputResult::Ignored;
    }
    game.sound_pitch(pitch);
    match game.guess(pitch) {
        Some(_) => InputResult::Guessed(pitch),
        None => InputResult::Ignored,
    }
}

/// Signal from the button device.
pub fn device_signal(game: &mut Game, signal: DeviceSignal) -> InputResult {
    let Some(pitch) = pitch_for_channel(signal.channel) else {
        debug!(channel = signal.channel, "unmapped device channel dropped");
        return InputResult::Ignored;
    };

    game.sound_pitch(pitch);

    if !game.is_awaiting_guess() || !game.profile().is_usable(pitch) {
        debug!(%pitch, phase = ?game.phase(), "device press not taken as a guess");
        return InputResult::Sounded(pitch);
    }

    match game.guess(pitch) {
        Some(_) => InputResult::Guessed(pitch),
        None => InputResult::Sounded(pitch),
    }
}
