pub mod config;
pub mod presets;
pub mod run;
pub mod sessions;

use stillwater_core::{presets as catalog, Database, Preset};

/// Built-in presets first, then custom ones from the database.
pub(crate) fn resolve_preset(db: &Database, id: &str) -> Result<Preset, Box<dyn std::error::Error>> {
    if let Some(preset) = catalog::find(id) {
        return Ok(preset);
    }
    match db.custom_preset(id)? {
        Some(custom) => Ok(custom.to_preset()),
        None => Err(format!("unknown preset: {id}").into()),
    }
}
