use std::io::{BufRead, Write};
use std::time::Duration;

use clap::Args;
use stillwater_core::{
    format, Config, Control, Cue, Database, Event, EventSink, Outcome, Preset, SessionDriver,
    SessionRecorder,
};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Args)]
pub struct RunArgs {
    /// Preset ID (built-in or custom)
    preset: String,
    /// Milliseconds per timer second (defaults to session.tick_ms)
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Print events as JSON lines instead of text
    #[arg(long)]
    json: bool,
    /// Disable audio cues for this run
    #[arg(long)]
    quiet: bool,
}

/// Renders events on stdout.
struct ConsoleSink {
    name: String,
    total_secs: u32,
    cycles: Option<u32>,
    json: bool,
}

impl ConsoleSink {
    fn new(preset: &Preset, json: bool) -> Self {
        Self {
            name: preset.name.clone(),
            total_secs: preset.duration_secs,
            cycles: preset.cycles,
            json,
        }
    }

    fn render(&self, event: &Event) -> String {
        match event {
            Event::SessionStarted { total_secs } => {
                format!("{} ({})", self.name, format::clock(*total_secs))
            }
            Event::PhaseChanged { phase, .. } => format!(
                "  {:<7} {:>3}s  {}",
                phase.kind.label(),
                phase.duration_secs,
                phase.instruction
            ),
            Event::CycleCompleted { cycle } => match self.cycles {
                Some(total) => format!("Cycle {cycle} of {total} done"),
                None => format!("Cycle {cycle} done"),
            },
            Event::SessionCompleted => {
                format!("Session complete ({})", format::clock(self.total_secs))
            }
            Event::Paused { total_remaining, .. } => {
                format!("Paused, {} left (r to resume)", format::clock(*total_remaining))
            }
            Event::Resumed { total_remaining, .. } => {
                format!("Resumed, {} left", format::clock(*total_remaining))
            }
            Event::Reset => "Session cancelled".to_string(),
        }
    }
}

impl EventSink for ConsoleSink {
    fn on_event(&mut self, event: &Event) {
        if !self.json {
            println!("{}", self.render(event));
        } else if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
    }
}

/// Stand-in for tone playback: rings the terminal bell on stderr.
struct CueSink {
    enabled: bool,
}

impl EventSink for CueSink {
    fn on_event(&mut self, event: &Event) {
        if !self.enabled {
            return;
        }
        if let Some(cue) = Cue::for_event(event) {
            let tone = cue.tone();
            debug!(?cue, hz = tone.frequency_hz, ms = tone.duration_ms, "cue");
            let mut stderr = std::io::stderr();
            let _ = stderr.write_all(b"\x07");
            let _ = stderr.flush();
        }
    }
}

fn parse_control(line: &str) -> Option<Control> {
    match line.trim() {
        "p" | "pause" => Some(Control::Pause),
        "r" | "resume" => Some(Control::Resume),
        "q" | "quit" => Some(Control::Reset),
        _ => None,
    }
}

/// Blocking stdin reader on its own thread; tokio's stdin is not meant for
/// interactive input. EOF closes the channel and the session runs on.
fn spawn_input(tx: mpsc::Sender<Control>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if let Some(control) = parse_control(&line) {
                if tx.blocking_send(control).is_err() {
                    break;
                }
            }
        }
    });
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut config = Config::load()?;
    let preset = super::resolve_preset(&db, &args.preset)?;

    let tick = args
        .tick_ms
        .map(|ms| Duration::from_millis(ms.max(1)))
        .unwrap_or_else(|| config.tick_interval());
    let sound = config.sound.enabled && !args.quiet;
    let return_delay = Duration::from_secs(config.session.return_delay_secs);

    config.last_used_preset = Some(preset.id.clone());
    config.save()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let outcome = runtime.block_on(async {
        let (tx, rx) = mpsc::channel(8);
        spawn_input(tx);

        let mut driver = SessionDriver::new(preset.pattern(), tick)
            .with_sink(ConsoleSink::new(&preset, args.json))
            .with_sink(CueSink { enabled: sound })
            .with_sink(SessionRecorder::new(&db, preset.clone()));
        let outcome = driver.run(rx).await?;

        if outcome == Outcome::Completed && !return_delay.is_zero() {
            tokio::time::sleep(return_delay).await;
        }
        Ok::<_, stillwater_core::TimerError>(outcome)
    })?;

    debug!(?outcome, preset = %preset.id, "run finished");
    Ok(())
}
