/// Named sound cues and the sink that plays them.
///
/// The core only raises cues; whatever implements [`AudioSink`] decides what
/// a cue sounds like. Unknown names are rejected up front instead of failing
/// at playback time.

use std::io::Write;

use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Explode,
    Laser,
    Music,
    Title,
}

impl SoundCue {
    pub const ALL: [SoundCue; 4] = [
        SoundCue::Explode,
        SoundCue::Laser,
        SoundCue::Music,
        SoundCue::Title,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SoundCue::Explode => "explode",
            SoundCue::Laser => "laser",
            SoundCue::Music => "music",
            SoundCue::Title => "title",
        }
    }

    pub fn from_name(name: &str) -> Result<SoundCue> {
        SoundCue::ALL
            .into_iter()
            .find(|cue| cue.name() == name)
            .ok_or_else(|| GameError::UnknownSound(name.to_string()))
    }
}

/// Fire-and-forget playback.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Discards every cue.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Rings the terminal bell for explosions; a terminal has nothing better.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        TerminalBell { out }
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("sound cue {}", cue.name());
        if cue == SoundCue::Explode {
            // Best effort: a lost bell is not worth interrupting the frame.
            if self.out.write_all(b"\x07").and_then(|_| self.out.flush()).is_err() {
                log::debug!("terminal bell unavailable");
            }
        }
    }
}

/// Buffers cues; handy for asserting what a frame asked to play.
#[derive(Debug, Default)]
pub struct Recorder {
    pub played: Vec<SoundCue>,
}

impl AudioSink for Recorder {
    fn play(&mut self, cue: SoundCue) {
        self.played.push(cue);
    }
}
