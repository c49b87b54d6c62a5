use serde::{Deserialize, Serialize};

use crate::timer::PhaseSpec;

/// Every state change in the timer produces an Event.
///
/// The engine returns events from its commands; the driver hands them to
/// each registered [`EventSink`] in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        total_secs: u32,
    },
    /// Raised on start and at every phase boundary.
    PhaseChanged {
        index: usize,
        phase: PhaseSpec,
    },
    /// A full traversal of the phases finished; `cycle` is the one just completed.
    CycleCompleted {
        cycle: u32,
    },
    SessionCompleted,
    Paused {
        total_remaining: u32,
        phase_remaining: u32,
    },
    Resumed {
        total_remaining: u32,
        phase_remaining: u32,
    },
    Reset,
}

/// Consumer of timer events: rendering, audio cues, persistence.
pub trait EventSink {
    fn on_event(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event),
{
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

/// Sink that keeps every event it sees.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

impl Extend<Event> for EventLog {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::PhaseKind;

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Event::CycleCompleted { cycle: 3 }).unwrap();
        assert_eq!(json["type"], "cycle_completed");
        assert_eq!(json["cycle"], 3);

        let json = serde_json::to_value(Event::SessionCompleted).unwrap();
        assert_eq!(json["type"], "session_completed");
    }

    #[test]
    fn phase_changed_round_trips() {
        let event = Event::PhaseChanged {
            index: 1,
            phase: PhaseSpec::new(PhaseKind::HoldAfterInhale, 7, "Hold"),
        };
        let text = serde_json::to_string(&event).unwrap();
        assert_eq!(serde_json::from_str::<Event>(&text).unwrap(), event);
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = 0;
        {
            let mut sink = |_: &Event| seen += 1;
            sink.on_event(&Event::Reset);
            sink.on_event(&Event::SessionCompleted);
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn log_counts_matching_events() {
        let mut log = EventLog::new();
        log.extend([Event::Reset, Event::SessionCompleted, Event::Reset]);
        assert_eq!(log.count(|e| matches!(e, Event::Reset)), 2);
        assert_eq!(log.last(), Some(&Event::Reset));
    }
}
