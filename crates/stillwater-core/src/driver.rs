//! Wall-clock driver for the timer engine.
//!
//! The engine only knows "one tick = one second of pattern time". This
//! adapter owns the real clock: a tokio interval fires once per configured
//! tick while the engine is running, and control messages (pause, resume,
//! reset) arrive over an mpsc channel. Ticks are gated on the engine state,
//! so time spent paused is never counted.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::error::TimerError;
use crate::events::{Event, EventSink};
use crate::timer::{Pattern, TimerEngine, TimerState};

/// Requests from the user while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    Reset,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

pub struct SessionDriver<'a> {
    engine: TimerEngine,
    sinks: Vec<Box<dyn EventSink + 'a>>,
    tick: Duration,
}

impl<'a> SessionDriver<'a> {
    pub fn new(pattern: Pattern, tick: Duration) -> Self {
        Self {
            engine: TimerEngine::new(pattern),
            sinks: Vec::new(),
            tick,
        }
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'a) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink + 'a>) {
        self.sinks.push(sink);
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            for sink in self.sinks.iter_mut() {
                sink.on_event(event);
            }
        }
    }

    /// Start the session and drive it until it completes or is reset.
    ///
    /// A closed control channel is not an error: the session keeps running
    /// to completion, unless it is paused at that moment, in which case it
    /// can never resume and is cancelled.
    ///
    /// # Errors
    /// Returns the engine's error if the session cannot start.
    pub async fn run(&mut self, mut controls: mpsc::Receiver<Control>) -> Result<Outcome, TimerError> {
        let events = self.engine.restart()?;
        self.dispatch(&events);

        let mut ticker = time::interval_at(Instant::now() + self.tick, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut controls_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick(), if self.engine.is_running() => {
                    let events = self.engine.tick();
                    self.dispatch(&events);
                    if self.engine.state() == TimerState::Completed {
                        return Ok(Outcome::Completed);
                    }
                }
                control = controls.recv(), if controls_open => {
                    match control {
                        Some(Control::Pause) => {
                            if let Some(event) = self.engine.pause() {
                                self.dispatch(&[event]);
                            }
                        }
                        Some(Control::Resume) => {
                            if let Some(event) = self.engine.resume() {
                                // A full tick must pass after resuming.
                                ticker.reset();
                                self.dispatch(&[event]);
                            }
                        }
                        Some(Control::Reset) => {
                            return Ok(self.cancel());
                        }
                        None => {
                            debug!("control channel closed");
                            controls_open = false;
                        }
                    }
                }
                else => {
                    return Ok(self.cancel());
                }
            }
        }
    }

    fn cancel(&mut self) -> Outcome {
        if let Some(event) = self.engine.reset() {
            self.dispatch(&[event]);
        }
        Outcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{PhaseKind, PhaseSpec};

    const SECOND: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn countdown_runs_to_completion() {
        let mut events = Vec::new();
        let (tx, rx) = mpsc::channel(4);
        drop(tx);

        let started = Instant::now();
        let outcome = {
            let mut driver = SessionDriver::new(Pattern::countdown(3), SECOND)
                .with_sink(|e: &Event| events.push(e.clone()));
            driver.run(rx).await.unwrap()
        };

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(
            events,
            vec![Event::SessionStarted { total_secs: 3 }, Event::SessionCompleted]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn paused_time_is_not_counted() {
        let mut events = Vec::new();
        let (tx, rx) = mpsc::channel(4);

        let controls = async move {
            time::sleep(Duration::from_millis(2500)).await;
            tx.send(Control::Pause).await.unwrap();
            time::sleep(Duration::from_secs(10)).await;
            tx.send(Control::Resume).await.unwrap();
        };

        let started = Instant::now();
        let outcome = {
            let mut driver = SessionDriver::new(Pattern::countdown(5), SECOND)
                .with_sink(|e: &Event| events.push(e.clone()));
            let (outcome, ()) = tokio::join!(driver.run(rx), controls);
            outcome.unwrap()
        };

        assert_eq!(outcome, Outcome::Completed);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(15), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(16), "{elapsed:?}");
        assert!(events.contains(&Event::Paused {
            total_remaining: 3,
            phase_remaining: 0
        }));
        assert!(events.contains(&Event::Resumed {
            total_remaining: 3,
            phase_remaining: 0
        }));
        assert_eq!(events.last(), Some(&Event::SessionCompleted));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_without_completion() {
        let mut events = Vec::new();
        let (tx, rx) = mpsc::channel(4);

        let controls = async move {
            time::sleep(Duration::from_millis(1500)).await;
            tx.send(Control::Reset).await.unwrap();
        };

        let pattern = Pattern::with_phases(
            60,
            vec![
                PhaseSpec::new(PhaseKind::Inhale, 4, "In"),
                PhaseSpec::new(PhaseKind::Exhale, 4, "Out"),
            ],
            None,
        );
        let outcome = {
            let mut driver =
                SessionDriver::new(pattern, SECOND).with_sink(|e: &Event| events.push(e.clone()));
            let (outcome, ()) = tokio::join!(driver.run(rx), controls);
            assert_eq!(driver.engine().state(), TimerState::Idle);
            outcome.unwrap()
        };

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(events.last(), Some(&Event::Reset));
        assert!(!events.contains(&Event::SessionCompleted));
    }

    #[tokio::test(start_paused = true)]
    async fn paused_with_closed_controls_is_cancelled() {
        let (tx, rx) = mpsc::channel(4);
        let controls = async move {
            time::sleep(Duration::from_millis(500)).await;
            tx.send(Control::Pause).await.unwrap();
        };

        let mut driver = SessionDriver::new(Pattern::countdown(30), SECOND);
        let (outcome, ()) = tokio::join!(driver.run(rx), controls);
        assert_eq!(outcome.unwrap(), Outcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_pattern_is_reported() {
        let (_tx, rx) = mpsc::channel(1);
        let mut driver = SessionDriver::new(Pattern::countdown(0), SECOND);
        assert!(matches!(
            driver.run(rx).await,
            Err(TimerError::InvalidPattern(_))
        ));
    }
}
