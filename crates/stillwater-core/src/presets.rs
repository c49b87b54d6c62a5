//! Built-in exercise catalog and user-defined presets.
//!
//! A [`Preset`] is what the user picks; its [`Preset::pattern`] is what the
//! timer engine runs. Custom presets go through [`NewCustomPreset::validate`]
//! before they are stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::timer::{Pattern, PhaseKind, PhaseSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetType {
    Countdown,
    BoxBreathing,
    #[serde(rename = "breathing_478")]
    Breathing478,
    CyclicSighing,
    Diaphragmatic,
    AlternateNostril,
    BodyScan,
    CustomInterval,
}

impl PresetType {
    pub const ALL: [PresetType; 8] = [
        PresetType::Countdown,
        PresetType::BoxBreathing,
        PresetType::Breathing478,
        PresetType::CyclicSighing,
        PresetType::Diaphragmatic,
        PresetType::AlternateNostril,
        PresetType::BodyScan,
        PresetType::CustomInterval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetType::Countdown => "countdown",
            PresetType::BoxBreathing => "box_breathing",
            PresetType::Breathing478 => "breathing_478",
            PresetType::CyclicSighing => "cyclic_sighing",
            PresetType::Diaphragmatic => "diaphragmatic",
            PresetType::AlternateNostril => "alternate_nostril",
            PresetType::BodyScan => "body_scan",
            PresetType::CustomInterval => "custom_interval",
        }
    }
}

impl fmt::Display for PresetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "type",
                value: s.to_string(),
            })
    }
}

/// A runnable exercise, built-in or custom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub preset_type: PresetType,
    /// Duration in seconds.
    pub duration_secs: u32,
    #[serde(default)]
    pub phases: Vec<PhaseSpec>,
    #[serde(default)]
    pub cycles: Option<u32>,
}

impl Preset {
    pub fn pattern(&self) -> Pattern {
        Pattern::with_phases(self.duration_secs, self.phases.clone(), self.cycles)
    }

    pub fn is_breathing(&self) -> bool {
        !self.phases.is_empty()
    }
}

fn countdown(id: &str, name: &str, description: &str, duration_secs: u32) -> Preset {
    Preset {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        preset_type: PresetType::Countdown,
        duration_secs,
        phases: Vec::new(),
        cycles: None,
    }
}

fn breathing(
    id: &str,
    name: &str,
    description: &str,
    preset_type: PresetType,
    duration_secs: u32,
    cycles: u32,
    phases: &[(PhaseKind, u32, &str)],
) -> Preset {
    Preset {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        preset_type,
        duration_secs,
        phases: phases
            .iter()
            .map(|&(kind, secs, text)| PhaseSpec::new(kind, secs, text))
            .collect(),
        cycles: Some(cycles),
    }
}

/// The presets shipped with the app.
pub fn builtin() -> Vec<Preset> {
    use PhaseKind::*;

    vec![
        countdown("countdown-5", "Quick Session", "5 minute mindful meditation", 300),
        countdown("countdown-10", "Standard", "10 minute practice", 600),
        countdown("countdown-15", "Deep Session", "15 minute meditation", 900),
        countdown("countdown-20", "Extended", "20 minute deep practice", 1200),
        countdown("countdown-25", "Long Practice", "25 minute meditation", 1500),
        breathing(
            "box-breathing",
            "Box Breathing",
            "4-4-4-4 pattern for focus",
            PresetType::BoxBreathing,
            300,
            10,
            &[
                (Inhale, 4, "Breathe in"),
                (HoldAfterInhale, 4, "Hold"),
                (Exhale, 4, "Breathe out"),
                (HoldAfterExhale, 4, "Hold"),
            ],
        ),
        breathing(
            "breathing-478",
            "4-7-8 Breathing",
            "For relaxation & sleep",
            PresetType::Breathing478,
            240,
            8,
            &[
                (Inhale, 4, "Breathe in"),
                (HoldAfterInhale, 7, "Hold"),
                (Exhale, 8, "Breathe out"),
            ],
        ),
        breathing(
            "cyclic-sighing",
            "Cyclic Sighing",
            "Fast stress relief",
            PresetType::CyclicSighing,
            300,
            20,
            &[
                (Inhale, 2, "Double inhale"),
                (Exhale, 8, "Long exhale"),
                (Rest, 2, "Rest"),
            ],
        ),
        breathing(
            "diaphragmatic",
            "Belly Breathing",
            "Deep diaphragmatic breath",
            PresetType::Diaphragmatic,
            360,
            12,
            &[
                (Inhale, 5, "Deep belly inhale"),
                (HoldAfterInhale, 2, "Gentle hold"),
                (Exhale, 6, "Slow belly exhale"),
                (Rest, 2, "Natural pause"),
            ],
        ),
        breathing(
            "alternate-nostril",
            "Nadi Shodhana",
            "Alternate nostril balance",
            PresetType::AlternateNostril,
            420,
            10,
            &[
                (Inhale, 4, "Inhale left nostril"),
                (HoldAfterInhale, 4, "Hold both"),
                (Exhale, 4, "Exhale right nostril"),
                (Rest, 2, "Rest"),
                (Inhale, 4, "Inhale right nostril"),
                (HoldAfterInhale, 4, "Hold both"),
                (Exhale, 4, "Exhale left nostril"),
                (Rest, 2, "Rest"),
            ],
        ),
        breathing(
            "body-scan",
            "Body Scan",
            "Guided body awareness",
            PresetType::BodyScan,
            600,
            1,
            &[
                (Rest, 30, "Feet and toes"),
                (Rest, 30, "Ankles and calves"),
                (Rest, 30, "Knees and thighs"),
                (Rest, 40, "Hips and lower back"),
                (Rest, 40, "Abdomen and chest"),
                (Rest, 30, "Hands and fingers"),
                (Rest, 30, "Arms and shoulders"),
                (Rest, 40, "Neck and throat"),
                (Rest, 40, "Face and head"),
                (Rest, 60, "Whole body awareness"),
                (Rest, 30, "Complete relaxation"),
            ],
        ),
    ]
}

/// Look up a built-in preset by id.
pub fn find(id: &str) -> Option<Preset> {
    builtin().into_iter().find(|p| p.id == id)
}

const NAME_MAX: usize = 50;
const DESCRIPTION_MAX: usize = 100;
const MIN_DURATION_SECS: u32 = 60;

/// User input for a new custom preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomPreset {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub preset_type: PresetType,
    pub duration_secs: u32,
    #[serde(default)]
    pub phases: Vec<PhaseSpec>,
    #[serde(default)]
    pub cycles: Option<u32>,
}

impl NewCustomPreset {
    /// # Errors
    /// Returns the first field that fails the builder rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("name", &self.name, NAME_MAX)?;
        check_length("description", &self.description, DESCRIPTION_MAX)?;
        if self.duration_secs < MIN_DURATION_SECS {
            return Err(ValidationError::TooSmall {
                field: "duration",
                min: MIN_DURATION_SECS,
            });
        }
        if matches!(self.cycles, Some(0)) {
            return Err(ValidationError::TooSmall {
                field: "cycles",
                min: 1,
            });
        }
        for (index, phase) in self.phases.iter().enumerate() {
            if phase.duration_secs == 0 {
                return Err(ValidationError::Phase {
                    index,
                    message: "duration must be at least 1 second".into(),
                });
            }
            if phase.instruction.trim().is_empty() {
                return Err(ValidationError::Phase {
                    index,
                    message: "instruction is required".into(),
                });
            }
        }
        Ok(())
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(ValidationError::Length { field, min: 1, max });
    }
    Ok(())
}

/// A custom preset as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPreset {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub preset_type: PresetType,
    pub duration_secs: u32,
    pub phases: Vec<PhaseSpec>,
    pub cycles: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl CustomPreset {
    pub fn to_preset(&self) -> Preset {
        Preset {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            preset_type: self.preset_type,
            duration_secs: self.duration_secs,
            phases: self.phases.clone(),
            cycles: self.cycles,
        }
    }
}

/// Encode phases for the `intervals` column. Empty lists are stored as NULL.
pub fn encode_phases(phases: &[PhaseSpec]) -> Result<Option<String>, serde_json::Error> {
    if phases.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(phases).map(Some)
}

/// Decode the `intervals` column. NULL and empty text both mean no phases.
pub fn decode_phases(raw: Option<&str>) -> Result<Vec<PhaseSpec>, ValidationError> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => {
            serde_json::from_str(text).map_err(|e| ValidationError::MalformedPhases(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewCustomPreset {
        NewCustomPreset {
            name: "Evening wind-down".into(),
            description: "Slow exhale focus".into(),
            preset_type: PresetType::CustomInterval,
            duration_secs: 300,
            phases: vec![
                PhaseSpec::new(PhaseKind::Inhale, 4, "Breathe in"),
                PhaseSpec::new(PhaseKind::Exhale, 6, "Breathe out"),
            ],
            cycles: Some(30),
        }
    }

    #[test]
    fn catalog_has_eleven_presets() {
        let all = builtin();
        assert_eq!(all.len(), 11);
        assert_eq!(
            all.iter().filter(|p| p.preset_type == PresetType::Countdown).count(),
            5
        );
    }

    #[test]
    fn catalog_ids_are_unique() {
        let all = builtin();
        let mut ids: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all.len());
    }

    #[test]
    fn every_builtin_pattern_is_runnable() {
        for preset in builtin() {
            assert!(preset.pattern().validate().is_ok(), "{}", preset.id);
        }
    }

    #[test]
    fn box_breathing_timings() {
        let p = find("box-breathing").unwrap();
        let pattern = p.pattern();
        assert_eq!(pattern.total_secs, 300);
        assert_eq!(pattern.cycle_secs(), 16);
        assert_eq!(pattern.cycles, Some(10));
    }

    #[test]
    fn body_scan_covers_its_duration() {
        let p = find("body-scan").unwrap();
        assert_eq!(p.phases.len(), 11);
        assert_eq!(p.pattern().cycle_secs(), 400);
        assert!(p.phases.iter().all(|s| s.kind == PhaseKind::Rest));
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(find("nope").is_none());
    }

    #[test]
    fn preset_type_wire_names() {
        assert_eq!(
            serde_json::to_value(PresetType::Breathing478).unwrap(),
            "breathing_478"
        );
        assert_eq!("body_scan".parse::<PresetType>().unwrap(), PresetType::BodyScan);
        for t in PresetType::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), t.as_str());
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn name_limits() {
        let mut d = draft();
        d.name = String::new();
        assert!(matches!(d.validate(), Err(ValidationError::Length { field: "name", .. })));
        d.name = "x".repeat(51);
        assert!(matches!(d.validate(), Err(ValidationError::Length { field: "name", .. })));
        d.name = "x".repeat(50);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn short_duration_rejected() {
        let mut d = draft();
        d.duration_secs = 59;
        assert_eq!(
            d.validate(),
            Err(ValidationError::TooSmall { field: "duration", min: 60 })
        );
    }

    #[test]
    fn zero_cycles_rejected() {
        let mut d = draft();
        d.cycles = Some(0);
        assert!(matches!(d.validate(), Err(ValidationError::TooSmall { field: "cycles", .. })));
    }

    #[test]
    fn blank_instruction_rejected() {
        let mut d = draft();
        d.phases[1].instruction = "  ".into();
        assert!(matches!(d.validate(), Err(ValidationError::Phase { index: 1, .. })));
    }

    #[test]
    fn phases_column_encoding() {
        assert_eq!(encode_phases(&[]).unwrap(), None);
        let text = encode_phases(&draft().phases).unwrap().unwrap();
        assert!(text.contains("\"phase\":\"inhale\""));
        assert_eq!(decode_phases(Some(&text)).unwrap(), draft().phases);
        assert!(decode_phases(Some("")).unwrap().is_empty());
        assert!(decode_phases(None).unwrap().is_empty());
        assert!(matches!(
            decode_phases(Some("[{\"phase\":\"sigh\"}]")),
            Err(ValidationError::MalformedPhases(_))
        ));
    }
}
