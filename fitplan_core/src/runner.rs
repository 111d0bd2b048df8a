//! Drives a [`SessionTimer`] in real time.
//!
//! Ticks and user commands are serialized on the calling thread: the runner
//! waits on a command channel with the next tick's deadline as timeout. While
//! paused or finished it waits without a deadline, so no ticks pile up. When
//! the run ends the timer and the tone emitter are dropped together, so no
//! tick can reach a discarded session.

use crate::session::{SessionState, SessionTimer};
use crate::tone::{Cue, LazyEmitter};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Skip,
    TogglePause,
    Restart,
    ToggleSound,
    Close,
}

impl SessionCommand {
    /// Single-key command as typed on the terminal
    pub fn from_key(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "s" | "skip" => Some(SessionCommand::Skip),
            "p" | "pause" | "resume" => Some(SessionCommand::TogglePause),
            "r" | "restart" => Some(SessionCommand::Restart),
            "m" | "mute" | "sound" => Some(SessionCommand::ToggleSound),
            "q" | "quit" | "close" => Some(SessionCommand::Close),
            _ => None,
        }
    }
}

/// What woke the runner up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Tick(Option<Cue>),
    Command(SessionCommand, Option<Cue>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    Closed,
    Disconnected,
}

#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub final_state: SessionState,
    pub ticks: u64,
    pub cues: Vec<Cue>,
    pub end_reason: EndReason,
}

impl SessionSummary {
    pub fn finished(&self) -> bool {
        self.final_state.phase == crate::session::Phase::Finished
    }
}

pub struct SessionRunner {
    timer: SessionTimer,
    emitter: LazyEmitter,
    tick_interval: Duration,
}

impl SessionRunner {
    pub fn new(timer: SessionTimer, emitter: LazyEmitter, tick_interval: Duration) -> Self {
        Self {
            timer,
            emitter,
            tick_interval,
        }
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    fn play(&mut self, cue: Option<Cue>, played: &mut Vec<Cue>) {
        if let Some(cue) = cue {
            self.emitter.play(cue);
            played.push(cue);
        }
    }

    /// Run until `Close` arrives or every sender is gone
    ///
    /// `observer` sees the timer after every tick and command.
    pub fn run<F>(mut self, commands: Receiver<SessionCommand>, mut observer: F) -> SessionSummary
    where
        F: FnMut(&SessionEvent, &SessionTimer),
    {
        let mut ticks = 0u64;
        let mut played = Vec::new();
        let mut deadline = Instant::now() + self.tick_interval;

        tracing::info!(
            "Starting session with {} exercises",
            self.timer.exercises().len()
        );

        let end_reason = loop {
            let idle = self.timer.state().paused || self.timer.is_finished();
            let received = if idle {
                match commands.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => break EndReason::Disconnected,
                }
            } else {
                let wait = deadline.saturating_duration_since(Instant::now());
                match commands.recv_timeout(wait) {
                    Ok(cmd) => Some(cmd),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break EndReason::Disconnected,
                }
            };

            let event = match received {
                None => {
                    ticks += 1;
                    deadline += self.tick_interval;
                    let cue = self.timer.tick();
                    self.play(cue, &mut played);
                    SessionEvent::Tick(cue)
                }
                Some(SessionCommand::Close) => break EndReason::Closed,
                Some(cmd) => {
                    let cue = match cmd {
                        SessionCommand::Skip => self.timer.skip(),
                        SessionCommand::TogglePause => {
                            self.timer.toggle_pause();
                            None
                        }
                        SessionCommand::Restart => {
                            self.timer.restart();
                            None
                        }
                        SessionCommand::ToggleSound => {
                            self.timer.toggle_sound();
                            None
                        }
                        SessionCommand::Close => None,
                    };
                    self.play(cue, &mut played);
                    // Sound and pause leave the running cadence alone
                    let moved = match cmd {
                        SessionCommand::Skip | SessionCommand::Restart => true,
                        SessionCommand::TogglePause => !self.timer.state().paused,
                        SessionCommand::ToggleSound | SessionCommand::Close => false,
                    };
                    if moved {
                        deadline = Instant::now() + self.tick_interval;
                    }
                    SessionEvent::Command(cmd, cue)
                }
            };

            observer(&event, &self.timer);
        };

        tracing::info!(
            "Session ended ({:?}) after {} ticks, phase {:?}",
            end_reason,
            ticks,
            self.timer.state().phase
        );

        SessionSummary {
            final_state: self.timer.state().clone(),
            ticks,
            cues: played,
            end_reason,
        }
    }
}
