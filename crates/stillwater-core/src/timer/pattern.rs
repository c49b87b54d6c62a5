use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PatternError, ValidationError};

/// What the user is asked to do during a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    #[serde(rename = "inhale")]
    Inhale,
    #[serde(rename = "hold")]
    HoldAfterInhale,
    #[serde(rename = "exhale")]
    Exhale,
    #[serde(rename = "hold2")]
    HoldAfterExhale,
    #[serde(rename = "rest")]
    Rest,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 5] = [
        PhaseKind::Inhale,
        PhaseKind::HoldAfterInhale,
        PhaseKind::Exhale,
        PhaseKind::HoldAfterExhale,
        PhaseKind::Rest,
    ];

    /// Wire name, as stored in custom presets.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Inhale => "inhale",
            PhaseKind::HoldAfterInhale => "hold",
            PhaseKind::Exhale => "exhale",
            PhaseKind::HoldAfterExhale => "hold2",
            PhaseKind::Rest => "rest",
        }
    }

    /// Short label shown next to the countdown.
    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Inhale => "Inhale",
            PhaseKind::HoldAfterInhale | PhaseKind::HoldAfterExhale => "Hold",
            PhaseKind::Exhale => "Exhale",
            PhaseKind::Rest => "Rest",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhaseKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "phase",
                value: s.to_string(),
            })
    }
}

/// One timed step of a breathing cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpec {
    #[serde(rename = "phase")]
    pub kind: PhaseKind,
    /// Duration in seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u32,
    pub instruction: String,
}

impl PhaseSpec {
    pub fn new(kind: PhaseKind, duration_secs: u32, instruction: impl Into<String>) -> Self {
        Self {
            kind,
            duration_secs,
            instruction: instruction.into(),
        }
    }
}

/// Immutable description of one exercise.
///
/// A pattern without phases is a plain countdown. With phases, the engine
/// cycles through them until `total_secs` runs out; `cycles` is only
/// informational and is never enforced against the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub total_secs: u32,
    #[serde(default)]
    pub phases: Vec<PhaseSpec>,
    #[serde(default)]
    pub cycles: Option<u32>,
}

impl Pattern {
    /// Plain countdown with no phases.
    pub fn countdown(total_secs: u32) -> Self {
        Self {
            total_secs,
            phases: Vec::new(),
            cycles: None,
        }
    }

    /// Phased pattern whose total covers exactly `cycles` traversals.
    pub fn cycled(phases: Vec<PhaseSpec>, cycles: u32) -> Self {
        let cycle_secs: u32 = phases.iter().map(|p| p.duration_secs).sum();
        Self {
            total_secs: cycle_secs.saturating_mul(cycles),
            phases,
            cycles: Some(cycles),
        }
    }

    /// Phased pattern with an independent total duration.
    pub fn with_phases(total_secs: u32, phases: Vec<PhaseSpec>, cycles: Option<u32>) -> Self {
        Self {
            total_secs,
            phases,
            cycles,
        }
    }

    pub fn has_phases(&self) -> bool {
        !self.phases.is_empty()
    }

    /// Seconds in one traversal of all phases (0 for a countdown).
    pub fn cycle_secs(&self) -> u32 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }

    /// Check the pattern can be run by the engine.
    ///
    /// # Errors
    /// Returns the first problem found: a zero total, or a phase of zero length.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.total_secs == 0 {
            return Err(PatternError::ZeroTotalDuration);
        }
        if let Some(index) = self.phases.iter().position(|p| p.duration_secs == 0) {
            return Err(PatternError::ZeroPhaseDuration { index });
        }
        Ok(())
    }
}
