//! Timer engine implementation.
//!
//! The timer engine is a clock-free state machine. It has no thread and no
//! notion of wall time: each call to `tick()` is exactly one second of
//! pattern time. The driver decides when a second has passed.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> Completed
//! Running | Paused -> Idle   (reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(pattern.clone());
//! let events = engine.start(pattern)?;
//! // Once per second while running:
//! let events = engine.tick();
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::pattern::{Pattern, PhaseKind, PhaseSpec};
use super::sequencer;
use crate::error::TimerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Display projection of the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseView {
    pub kind: PhaseKind,
    pub label: String,
    pub instruction: String,
}

impl From<&PhaseSpec> for PhaseView {
    fn from(spec: &PhaseSpec) -> Self {
        Self {
            kind: spec.kind,
            label: spec.kind.label().to_string(),
            instruction: spec.instruction.clone(),
        }
    }
}

/// Full read-only view of the engine, for rendering and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub total_secs: u32,
    pub total_remaining: u32,
    pub phase_index: usize,
    pub phase_remaining: u32,
    pub phase: Option<PhaseView>,
    pub cycle: u32,
    pub cycles: Option<u32>,
    /// 0.0 .. 1.0 of the total duration elapsed.
    pub progress: f64,
}

/// Core timer engine.
///
/// One instance per session. Mutated only through `start`, `tick`,
/// `pause`, `resume` and `reset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    pattern: Pattern,
    state: TimerState,
    /// Seconds left in the whole session.
    total_remaining: u32,
    phase_index: usize,
    /// Seconds left in the current phase (0 without phases).
    phase_remaining: u32,
    /// 1-based number of the cycle in progress.
    cycle: u32,
}

impl TimerEngine {
    /// Create an idle engine primed with `pattern`.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            total_remaining: pattern.total_secs,
            pattern,
            state: TimerState::Idle,
            phase_index: 0,
            phase_remaining: 0,
            cycle: 1,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Running or paused.
    pub fn is_active(&self) -> bool {
        matches!(self.state, TimerState::Running | TimerState::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn total_remaining(&self) -> u32 {
        self.total_remaining
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn phase_remaining(&self) -> u32 {
        self.phase_remaining
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Current phase while a session is active.
    pub fn current_phase(&self) -> Option<&PhaseSpec> {
        if !self.is_active() {
            return None;
        }
        sequencer::current_phase(&self.pattern, self.phase_index)
    }

    /// Phase kind and instruction for display; `None` for countdowns or
    /// when no session is active.
    pub fn current_phase_view(&self) -> Option<PhaseView> {
        self.current_phase().map(PhaseView::from)
    }

    /// 0.0 .. 1.0 of the session elapsed.
    pub fn progress(&self) -> f64 {
        let total = self.pattern.total_secs;
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.total_remaining as f64 / total as f64)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            total_secs: self.pattern.total_secs,
            total_remaining: self.total_remaining,
            phase_index: self.phase_index,
            phase_remaining: self.phase_remaining,
            phase: self.current_phase_view(),
            cycle: self.cycle,
            cycles: self.pattern.cycles,
            progress: self.progress(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session with `pattern`.
    ///
    /// Emits `SessionStarted`, then `PhaseChanged` for the first phase when
    /// the pattern has phases.
    ///
    /// # Errors
    /// `InvalidState` if a session is already running or paused;
    /// `InvalidPattern` if the pattern fails validation. The engine is left
    /// untouched in both cases.
    pub fn start(&mut self, pattern: Pattern) -> Result<Vec<Event>, TimerError> {
        if self.is_active() {
            return Err(TimerError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }
        pattern.validate()?;

        self.pattern = pattern;
        self.state = TimerState::Running;
        self.total_remaining = self.pattern.total_secs;
        self.phase_index = 0;
        self.phase_remaining = 0;
        self.cycle = 1;

        let mut events = vec![Event::SessionStarted {
            total_secs: self.pattern.total_secs,
        }];
        if let Some(first) = sequencer::current_phase(&self.pattern, 0) {
            self.phase_remaining = first.duration_secs;
            events.push(Event::PhaseChanged {
                index: 0,
                phase: first.clone(),
            });
        }
        info!(
            total_secs = self.pattern.total_secs,
            phases = self.pattern.phases.len(),
            "session started"
        );
        Ok(events)
    }

    /// Start again with the pattern the engine already holds.
    ///
    /// # Errors
    /// Same as [`TimerEngine::start`].
    pub fn restart(&mut self) -> Result<Vec<Event>, TimerError> {
        self.start(self.pattern.clone())
    }

    /// Advance one second. Ignored unless running.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }

        self.total_remaining = self.total_remaining.saturating_sub(1);
        if self.total_remaining == 0 {
            // Completion wins over a phase boundary on the same tick.
            self.state = TimerState::Completed;
            info!(cycle = self.cycle, "session completed");
            return vec![Event::SessionCompleted];
        }

        if !self.pattern.has_phases() {
            return Vec::new();
        }

        self.phase_remaining = self.phase_remaining.saturating_sub(1);
        if self.phase_remaining > 0 {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(step) = sequencer::advance_phase(&self.pattern, self.phase_index) {
            self.phase_index = step.next_index;
            if step.wrapped {
                events.push(Event::CycleCompleted { cycle: self.cycle });
                self.cycle += 1;
            }
            if let Some(next) = sequencer::current_phase(&self.pattern, step.next_index) {
                self.phase_remaining = next.duration_secs;
                debug!(
                    index = step.next_index,
                    phase = %next.kind,
                    cycle = self.cycle,
                    "phase changed"
                );
                events.push(Event::PhaseChanged {
                    index: step.next_index,
                    phase: next.clone(),
                });
            }
        }
        events
    }

    /// Freeze both counters. Ignored unless running.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        debug!(total_remaining = self.total_remaining, "paused");
        Some(Event::Paused {
            total_remaining: self.total_remaining,
            phase_remaining: self.phase_remaining,
        })
    }

    /// Continue a paused session. Ignored unless paused.
    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        debug!(total_remaining = self.total_remaining, "resumed");
        Some(Event::Resumed {
            total_remaining: self.total_remaining,
            phase_remaining: self.phase_remaining,
        })
    }

    /// Return to idle from any state. Never reports completion.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.total_remaining = self.pattern.total_secs;
        self.phase_index = 0;
        self.phase_remaining = 0;
        self.cycle = 1;
        debug!("reset");
        Some(Event::Reset)
    }
}
