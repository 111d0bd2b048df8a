//! Guided workout session timer.
//!
//! A phase state machine over one day's ordered exercise list:
//!
//! 1. A session starts in `Ready` for the first exercise.
//! 2. `Ready` → `Work` → `Rest`, each phase counting down once per tick.
//! 3. From `Rest`, the next exercise starts directly in `Work`; after the last
//!    exercise the session is `Finished`.
//! 4. A countdown cue is requested whenever a tick lands on 3, 2 or 1 seconds.
//! 5. Skip jumps to the next exercise's `Work` (or `Finished`), bypassing `Rest`.
//! 6. While paused, ticks change nothing.
//!
//! The timer owns its [`SessionState`] and never schedules anything itself;
//! see [`crate::runner`] for the driver.

use crate::config::SessionConfig;
use crate::tone::Cue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Ready,
    Work,
    Rest,
    Finished,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Ready => "Get ready",
            Phase::Work => "Work",
            Phase::Rest => "Rest",
            Phase::Finished => "Finished",
        }
    }
}

/// Length of each timed phase, in ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseDurations {
    pub ready: u32,
    pub work: u32,
    pub rest: u32,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            ready: 3,
            work: 30,
            rest: 10,
        }
    }
}

impl From<&SessionConfig> for PhaseDurations {
    fn from(config: &SessionConfig) -> Self {
        Self {
            ready: config.ready_seconds,
            work: config.work_seconds,
            rest: config.rest_seconds,
        }
    }
}

impl PhaseDurations {
    /// Full length of a phase; zero for `Finished`
    pub fn of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Ready => self.ready,
            Phase::Work => self.work,
            Phase::Rest => self.rest,
            Phase::Finished => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub exercise_index: usize,
    pub seconds_remaining: u32,
    pub paused: bool,
    pub sound_enabled: bool,
}

#[derive(Clone, Debug)]
pub struct SessionTimer {
    exercises: Vec<String>,
    durations: PhaseDurations,
    state: SessionState,
}

impl SessionTimer {
    /// Start a session over `exercises`, in display order
    ///
    /// An empty list starts out `Finished`.
    pub fn new(exercises: Vec<String>, durations: PhaseDurations, sound_enabled: bool) -> Self {
        let mut timer = Self {
            exercises,
            durations,
            state: SessionState {
                phase: Phase::Ready,
                exercise_index: 0,
                seconds_remaining: 0,
                paused: false,
                sound_enabled,
            },
        };
        timer.reset_to_start();
        timer
    }

    fn reset_to_start(&mut self) {
        self.state.exercise_index = 0;
        self.state.paused = false;
        if self.exercises.is_empty() {
            self.state.phase = Phase::Finished;
            self.state.seconds_remaining = 0;
        } else {
            self.state.phase = Phase::Ready;
            self.state.seconds_remaining = self.durations.ready;
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn exercises(&self) -> &[String] {
        &self.exercises
    }

    pub fn is_finished(&self) -> bool {
        self.state.phase == Phase::Finished
    }

    /// Exercise the session is on, if not finished
    pub fn current_exercise(&self) -> Option<&str> {
        if self.is_finished() {
            return None;
        }
        self.exercises
            .get(self.state.exercise_index)
            .map(String::as_str)
    }

    /// Fraction of the active phase already elapsed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        let total = self.durations.of(self.state.phase);
        if self.is_finished() || total == 0 {
            return 1.0;
        }
        let remaining = self.state.seconds_remaining.min(total);
        1.0 - f64::from(remaining) / f64::from(total)
    }

    fn enter(&mut self, phase: Phase) {
        self.state.phase = phase;
        self.state.seconds_remaining = self.durations.of(phase);
    }

    fn audible(&self, cue: Cue) -> Option<Cue> {
        self.state.sound_enabled.then_some(cue)
    }

    /// Advance the countdown by one step
    ///
    /// Returns the cue to play, if any. Does nothing while paused or finished.
    pub fn tick(&mut self) -> Option<Cue> {
        if self.state.paused || self.is_finished() {
            return None;
        }

        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        if self.state.seconds_remaining > 0 {
            return if self.state.seconds_remaining <= 3 {
                self.audible(Cue::Tick)
            } else {
                None
            };
        }

        let cue = match self.state.phase {
            Phase::Ready => {
                self.enter(Phase::Work);
                Cue::WorkStart
            }
            Phase::Work => {
                self.enter(Phase::Rest);
                Cue::RestStart
            }
            Phase::Rest => self.advance_exercise(),
            Phase::Finished => return None,
        };
        tracing::debug!(
            "Session moved to {:?} on exercise {}",
            self.state.phase,
            self.state.exercise_index
        );
        self.audible(cue)
    }

    /// Next exercise in `Work`, or `Finished` after the last one
    fn advance_exercise(&mut self) -> Cue {
        if self.state.exercise_index + 1 < self.exercises.len() {
            self.state.exercise_index += 1;
            self.enter(Phase::Work);
            Cue::WorkStart
        } else {
            self.enter(Phase::Finished);
            Cue::Finish
        }
    }

    /// Jump straight to the next exercise's work phase
    pub fn skip(&mut self) -> Option<Cue> {
        if self.is_finished() {
            return None;
        }
        let cue = self.advance_exercise();
        tracing::debug!("Skipped to {:?} on exercise {}", self.state.phase, self.state.exercise_index);
        self.audible(cue)
    }

    pub fn pause(&mut self) {
        if !self.is_finished() {
            self.state.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.state.paused = false;
    }

    /// Returns whether the session is now paused
    pub fn toggle_pause(&mut self) -> bool {
        if self.state.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.state.paused
    }

    /// Back to `Ready` on the first exercise, from any phase
    pub fn restart(&mut self) {
        self.reset_to_start();
        tracing::debug!("Session restarted");
    }

    /// Returns whether sound is now enabled
    pub fn toggle_sound(&mut self) -> bool {
        self.state.sound_enabled = !self.state.sound_enabled;
        self.state.sound_enabled
    }
}
