//! Event sink that stores a finished session.

use chrono::Utc;
use tracing::{info, warn};

use crate::events::{Event, EventSink};
use crate::presets::Preset;
use crate::storage::{NewSession, SessionStore};

/// Persists one session record when the engine reports completion.
///
/// Best effort: a failing store is logged and otherwise ignored, the timer
/// never sees it.
pub struct SessionRecorder<'a, S: SessionStore + ?Sized> {
    store: &'a S,
    preset: Preset,
}

impl<'a, S: SessionStore + ?Sized> SessionRecorder<'a, S> {
    pub fn new(store: &'a S, preset: Preset) -> Self {
        Self { store, preset }
    }
}

impl<S: SessionStore + ?Sized> EventSink for SessionRecorder<'_, S> {
    fn on_event(&mut self, event: &Event) {
        if *event != Event::SessionCompleted {
            return;
        }
        let record = NewSession::for_preset(&self.preset, Utc::now());
        match self.store.create_session(&record) {
            Ok(saved) => info!(id = %saved.id, preset = %saved.preset_id, "session saved"),
            Err(e) => warn!(preset = %self.preset.id, "could not save session: {e}"),
        }
    }
}
