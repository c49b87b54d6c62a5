mod engine;
mod pattern;
pub mod sequencer;

pub use engine::{PhaseView, TimerEngine, TimerSnapshot, TimerState};
pub use pattern::{Pattern, PhaseKind, PhaseSpec};
pub use sequencer::PhaseAdvance;
