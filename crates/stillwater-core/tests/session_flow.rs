//! End-to-end: preset -> driver -> sinks -> database.

use std::time::Duration;

use stillwater_core::{
    presets, Control, Database, Event, EventLog, EventSink, Outcome, PhaseKind, SessionDriver,
    SessionRecorder, SessionStore,
};
use tokio::sync::mpsc;

#[tokio::test(start_paused = true)]
async fn box_breathing_session_is_recorded() {
    let db = Database::open_memory().unwrap();
    let preset = presets::find("box-breathing").unwrap();
    let mut log = EventLog::new();

    let (tx, rx) = mpsc::channel(1);
    drop(tx);

    let outcome = {
        let mut driver = SessionDriver::new(preset.pattern(), Duration::from_secs(1))
            .with_sink(|e: &Event| log.on_event(e))
            .with_sink(SessionRecorder::new(&db, preset.clone()));
        driver.run(rx).await.unwrap()
    };
    assert_eq!(outcome, Outcome::Completed);

    // 300s of 16s cycles: 18 full cycles, the 19th cut short.
    let cycles = log.count(|e| matches!(e, Event::CycleCompleted { .. }));
    assert_eq!(cycles, 18);
    assert_eq!(log.count(|e| *e == Event::SessionCompleted), 1);
    assert_eq!(log.last(), Some(&Event::SessionCompleted));

    let inhales = log.count(|e| {
        matches!(e, Event::PhaseChanged { phase, .. } if phase.kind == PhaseKind::Inhale)
    });
    assert_eq!(inhales, 19);

    let sessions = db.list_sessions(10).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].preset_id, "box-breathing");
    assert_eq!(sessions[0].duration_secs, 300);

    let stats = db.session_stats().unwrap();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.total_minutes, 5);
    assert_eq!(stats.current_streak, 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_session_is_not_recorded() {
    let db = Database::open_memory().unwrap();
    let preset = presets::find("countdown-5").unwrap();

    let (tx, rx) = mpsc::channel(1);
    let controls = async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        tx.send(Control::Reset).await.unwrap();
    };

    let mut driver = SessionDriver::new(preset.pattern(), Duration::from_secs(1))
        .with_sink(SessionRecorder::new(&db, preset.clone()));
    let (outcome, ()) = tokio::join!(driver.run(rx), controls);
    drop(driver);

    assert_eq!(outcome.unwrap(), Outcome::Cancelled);
    assert!(db.list_sessions(10).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn custom_preset_runs_like_builtin() {
    let db = Database::open_memory().unwrap();
    let created = db
        .create_custom_preset(&stillwater_core::NewCustomPreset {
            name: "Short sigh".into(),
            description: "Two quick cycles".into(),
            preset_type: stillwater_core::PresetType::CustomInterval,
            duration_secs: 60,
            phases: vec![
                stillwater_core::PhaseSpec::new(PhaseKind::Inhale, 2, "In"),
                stillwater_core::PhaseSpec::new(PhaseKind::Exhale, 4, "Out"),
            ],
            cycles: Some(10),
        })
        .unwrap();

    let preset = db.list_custom_presets().unwrap()[0].to_preset();
    assert_eq!(preset.id, created.id);

    let (_tx, rx) = mpsc::channel(1);
    let mut log = EventLog::new();
    let outcome = {
        let mut driver = SessionDriver::new(preset.pattern(), Duration::from_millis(10))
            .with_sink(|e: &Event| log.on_event(e))
            .with_sink(SessionRecorder::new(&db, preset.clone()));
        driver.run(rx).await.unwrap()
    };

    assert_eq!(outcome, Outcome::Completed);
    // 60s / 6s: nine wraps before the final second lands on a boundary.
    assert_eq!(log.count(|e| matches!(e, Event::CycleCompleted { .. })), 9);
    assert_eq!(db.list_sessions(1).unwrap()[0].preset_name, "Short sigh");
}
