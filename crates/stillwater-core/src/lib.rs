//! # Stillwater Core Library
//!
//! Core logic for the Stillwater meditation and breathing timer. The CLI
//! is a thin front end over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a clock-free state machine over a [`Pattern`]; each
//!   `tick()` is one second of pattern time
//! - **Driver**: tokio adapter that ticks the engine on a real clock and
//!   fans events out to sinks
//! - **Presets**: built-in exercise catalog plus validated custom presets
//! - **Storage**: SQLite session history and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SessionDriver`]: Wall-clock driver
//! - [`Database`]: Session and custom preset persistence
//! - [`Config`]: Application configuration management

pub mod cues;
pub mod driver;
pub mod error;
pub mod events;
pub mod format;
pub mod presets;
pub mod recorder;
pub mod stats;
pub mod storage;
pub mod timer;

pub use cues::{AmbientSound, Cue};
pub use driver::{Control, Outcome, SessionDriver};
pub use error::{ConfigError, CoreError, DatabaseError, PatternError, TimerError, ValidationError};
pub use events::{Event, EventLog, EventSink};
pub use presets::{CustomPreset, NewCustomPreset, Preset, PresetType};
pub use recorder::SessionRecorder;
pub use stats::SessionStats;
pub use storage::{Config, Database, NewSession, SessionRecord, SessionStore};
pub use timer::{Pattern, PhaseKind, PhaseSpec, PhaseView, TimerEngine, TimerSnapshot, TimerState};
