use clap::Subcommand;
use stillwater_core::format;
use stillwater_core::presets as catalog;
use stillwater_core::{Database, NewCustomPreset, PhaseKind, PhaseSpec, Preset, PresetType, SessionStore};

#[derive(Subcommand)]
pub enum PresetsAction {
    /// List built-in and custom presets
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one preset as JSON
    Show {
        /// Preset ID
        id: String,
    },
    /// Create a custom preset
    Create {
        /// Display name (1-50 characters)
        #[arg(long)]
        name: String,
        /// Short description (1-100 characters)
        #[arg(long)]
        description: String,
        /// Preset type (e.g. "custom_interval", "box_breathing")
        #[arg(long = "type", default_value = "custom_interval")]
        preset_type: PresetType,
        /// Total duration in seconds (at least 60)
        #[arg(long)]
        duration: u32,
        /// Informational cycle count
        #[arg(long)]
        cycles: Option<u32>,
        /// Phase as "kind:seconds[:instruction]", repeatable and kept in order
        #[arg(long = "phase", value_parser = parse_phase)]
        phases: Vec<PhaseSpec>,
    },
    /// Delete a custom preset
    Delete {
        /// Preset ID
        id: String,
    },
}

fn parse_phase(raw: &str) -> Result<PhaseSpec, String> {
    let mut parts = raw.splitn(3, ':');
    let kind: PhaseKind = parts
        .next()
        .unwrap_or_default()
        .parse()
        .map_err(|e| format!("{e}"))?;
    let secs: u32 = parts
        .next()
        .ok_or_else(|| format!("missing seconds in '{raw}'"))?
        .parse()
        .map_err(|_| format!("cannot parse seconds in '{raw}'"))?;
    let instruction = match parts.next() {
        Some(text) => text.to_string(),
        None => kind.label().to_string(),
    };
    Ok(PhaseSpec::new(kind, secs, instruction))
}

fn print_table(presets: &[Preset]) {
    for preset in presets {
        let cycles = preset
            .cycles
            .map(|c| format!("{c} cycles"))
            .unwrap_or_default();
        println!(
            "{:<22} {:<24} {:>5}  {}",
            preset.id,
            preset.name,
            format::short(preset.duration_secs),
            cycles
        );
    }
}

pub fn run(action: PresetsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        PresetsAction::List { json } => {
            let mut presets = catalog::builtin();
            presets.extend(db.list_custom_presets()?.iter().map(|c| c.to_preset()));
            if json {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            } else {
                print_table(&presets);
            }
        }
        PresetsAction::Show { id } => {
            let preset = super::resolve_preset(&db, &id)?;
            println!("{}", serde_json::to_string_pretty(&preset)?);
        }
        PresetsAction::Create {
            name,
            description,
            preset_type,
            duration,
            cycles,
            phases,
        } => {
            let input = NewCustomPreset {
                name,
                description,
                preset_type,
                duration_secs: duration,
                phases,
                cycles,
            };
            let created = db.create_custom_preset(&input)?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        PresetsAction::Delete { id } => {
            if catalog::find(&id).is_some() {
                return Err(format!("cannot delete built-in preset: {id}").into());
            }
            db.delete_custom_preset(&id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_with_instruction() {
        let phase = parse_phase("hold2:4:Hold empty: count four").unwrap();
        assert_eq!(phase.kind, PhaseKind::HoldAfterExhale);
        assert_eq!(phase.duration_secs, 4);
        assert_eq!(phase.instruction, "Hold empty: count four");
    }

    #[test]
    fn phase_instruction_defaults_to_label() {
        let phase = parse_phase("exhale:8").unwrap();
        assert_eq!(phase.instruction, "Exhale");
    }

    #[test]
    fn phase_rejects_bad_input() {
        assert!(parse_phase("sigh:4").is_err());
        assert!(parse_phase("inhale").is_err());
        assert!(parse_phase("inhale:four").is_err());
    }
}
