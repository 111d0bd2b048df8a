//! Audio cues requested by the session timer.
//!
//! Emitters are fire-and-forget. [`LazyEmitter`] creates the real emitter on
//! the first cue of a session and swallows any failure it reports.

use crate::Result;
use std::io::Write;

/// Named audio feedback event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Countdown beep during the last three seconds of a phase
    Tick,
    WorkStart,
    RestStart,
    Finish,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Tick => "tick",
            Cue::WorkStart => "work-start",
            Cue::RestStart => "rest-start",
            Cue::Finish => "finish",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Cue::Tick => Tone::new(800, 80, 1),
            Cue::WorkStart => Tone::new(1000, 120, 1),
            Cue::RestStart => Tone::new(600, 180, 2),
            Cue::Finish => Tone::new(1200, 150, 3),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    pub repeat: u32,
}

impl Tone {
    pub const fn new(frequency_hz: u32, duration_ms: u32, repeat: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
            repeat,
        }
    }
}

/// Something that can play a tone
pub trait ToneEmitter {
    fn emit(&mut self, tone: Tone) -> Result<()>;
}

/// Rings the terminal bell once per repeat
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ToneEmitter for TerminalBell<W> {
    fn emit(&mut self, tone: Tone) -> Result<()> {
        for _ in 0..tone.repeat {
            self.out.write_all(b"\x07")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SilentEmitter;

impl ToneEmitter for SilentEmitter {
    fn emit(&mut self, _tone: Tone) -> Result<()> {
        Ok(())
    }
}

type EmitterFactory = Box<dyn FnOnce() -> Result<Box<dyn ToneEmitter>> + Send>;

/// Emitter created on first use and owned by one session
pub struct LazyEmitter {
    factory: Option<EmitterFactory>,
    emitter: Option<Box<dyn ToneEmitter>>,
}

impl LazyEmitter {
    pub fn new<F>(factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn ToneEmitter>> + Send + 'static,
    {
        Self {
            factory: Some(Box::new(factory)),
            emitter: None,
        }
    }

    pub fn silent() -> Self {
        Self::new(|| Ok(Box::new(SilentEmitter)))
    }

    pub fn is_initialized(&self) -> bool {
        self.emitter.is_some()
    }

    /// Play the cue's tone. Never fails.
    pub fn play(&mut self, cue: Cue) {
        if self.emitter.is_none() {
            let Some(factory) = self.factory.take() else {
                // Creation already failed once this session
                return;
            };
            match factory() {
                Ok(emitter) => self.emitter = Some(emitter),
                Err(e) => {
                    tracing::debug!("Tone emitter unavailable: {}", e);
                    return;
                }
            }
        }

        if let Some(emitter) = self.emitter.as_mut() {
            if let Err(e) = emitter.emit(cue.tone()) {
                tracing::debug!("Failed to play '{}' cue: {}", cue.name(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::{Arc, Mutex};

    /// Records every tone it is asked to play
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Tone>>>);

    impl ToneEmitter for Recorder {
        fn emit(&mut self, tone: Tone) -> Result<()> {
            self.0.lock().unwrap().push(tone);
            Ok(())
        }
    }

    struct Broken;

    impl ToneEmitter for Broken {
        fn emit(&mut self, _tone: Tone) -> Result<()> {
            Err(Error::Other("no audio device".into()))
        }
    }

    #[test]
    fn test_cue_tones() {
        assert_eq!(Cue::Tick.tone(), Tone::new(800, 80, 1));
        assert_eq!(Cue::RestStart.tone().repeat, 2);
        assert_eq!(Cue::Finish.tone().repeat, 3);
        assert_eq!(Cue::WorkStart.name(), "work-start");
    }

    #[test]
    fn test_terminal_bell_rings_per_repeat() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.emit(Cue::Finish.tone()).unwrap();
        assert_eq!(bell.into_inner(), b"\x07\x07\x07".to_vec());
    }

    #[test]
    fn test_lazy_emitter_created_on_first_cue() {
        let recorder = Recorder::default();
        let log = recorder.0.clone();
        let mut lazy = LazyEmitter::new(move || Ok(Box::new(recorder) as Box<dyn ToneEmitter>));

        assert!(!lazy.is_initialized());
        lazy.play(Cue::WorkStart);
        lazy.play(Cue::Tick);
        assert!(lazy.is_initialized());
        assert_eq!(
            *log.lock().unwrap(),
            vec![Cue::WorkStart.tone(), Cue::Tick.tone()]
        );
    }

    #[test]
    fn test_failures_are_swallowed() {
        let mut broken = LazyEmitter::new(|| Ok(Box::new(Broken) as Box<dyn ToneEmitter>));
        broken.play(Cue::Finish);

        let mut unavailable = LazyEmitter::new(|| Err(Error::Other("no device".into())));
        unavailable.play(Cue::Tick);
        unavailable.play(Cue::Tick);
        assert!(!unavailable.is_initialized());
    }
}
