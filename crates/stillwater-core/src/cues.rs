//! Audio cues and ambient sound selection.
//!
//! The engine knows nothing about sound. A cue sink maps events to one of
//! three tones and plays them however the front end can.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Start,
    PhaseChange,
    Complete,
}

/// Sine tone parameters for a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

impl Cue {
    pub fn tone(&self) -> Tone {
        match self {
            Cue::Start => Tone {
                frequency_hz: 528,
                duration_ms: 300,
            },
            Cue::PhaseChange => Tone {
                frequency_hz: 440,
                duration_ms: 150,
            },
            Cue::Complete => Tone {
                frequency_hz: 660,
                duration_ms: 500,
            },
        }
    }

    /// Cue to play for an event, if any.
    pub fn for_event(event: &Event) -> Option<Cue> {
        match event {
            Event::SessionStarted { .. } => Some(Cue::Start),
            Event::PhaseChanged { .. } => Some(Cue::PhaseChange),
            Event::SessionCompleted => Some(Cue::Complete),
            Event::CycleCompleted { .. }
            | Event::Paused { .. }
            | Event::Resumed { .. }
            | Event::Reset => None,
        }
    }
}

/// Background loop played during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientSound {
    #[default]
    None,
    Rain,
    Ocean,
    Forest,
}

impl AmbientSound {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbientSound::None => "none",
            AmbientSound::Rain => "rain",
            AmbientSound::Ocean => "ocean",
            AmbientSound::Forest => "forest",
        }
    }
}

impl fmt::Display for AmbientSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmbientSound {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(AmbientSound::None),
            "rain" => Ok(AmbientSound::Rain),
            "ocean" => Ok(AmbientSound::Ocean),
            "forest" => Ok(AmbientSound::Forest),
            other => Err(ValidationError::UnknownVariant {
                field: "ambient",
                value: other.to_string(),
            }),
        }
    }
}
