// End-to-end pass over the public surface: schedule, replace, fire, re-arm.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Local, Timelike};
use rusqlite::Connection;
use tokio::sync::mpsc;
use wakeup_core::events::WakeupEvent;
use wakeup_scheduler::{
    AlarmDriver, AlarmKind, AlarmSpec, DayOfWeek, Result, TimeOfDay, TriggerPayload, WakeupEngine,
};

#[derive(Default)]
struct RecordingDriver {
    scheduled: Mutex<Vec<(i64, DateTime<Local>, TriggerPayload)>>,
    cancelled: Mutex<Vec<i64>>,
    boot_rearm: Mutex<Vec<bool>>,
    deny_exact: AtomicBool,
}

impl AlarmDriver for RecordingDriver {
    fn schedule(&self, id: i64, at: DateTime<Local>, payload: &TriggerPayload) -> Result<()> {
        self.scheduled
            .lock()
            .unwrap()
            .push((id, at, payload.clone()));
        Ok(())
    }

    fn cancel(&self, id: i64) -> Result<()> {
        self.cancelled.lock().unwrap().push(id);
        Ok(())
    }

    fn can_schedule_exact(&self) -> bool {
        !self.deny_exact.load(Ordering::SeqCst)
    }

    fn set_boot_rearm(&self, enabled: bool) -> Result<()> {
        self.boot_rearm.lock().unwrap().push(enabled);
        Ok(())
    }

    fn stop_session(&self) -> Result<()> {
        Ok(())
    }
}

fn engine_with_driver() -> (WakeupEngine, Arc<RecordingDriver>) {
    let driver = Arc::new(RecordingDriver::default());
    let engine = WakeupEngine::new(
        Connection::open_in_memory().unwrap(),
        Arc::clone(&driver) as Arc<dyn AlarmDriver>,
    )
    .unwrap();
    (engine, driver)
}

fn morning_alarms() -> Vec<AlarmSpec> {
    vec![
        AlarmSpec {
            kind: AlarmKind::OneTime,
            time: Some(TimeOfDay {
                hour: Some(7),
                minute: 30,
            }),
            days: None,
            extra: Some(serde_json::json!({"label": "coffee"})),
        },
        AlarmSpec {
            kind: AlarmKind::DayList,
            time: Some(TimeOfDay {
                hour: Some(6),
                minute: 0,
            }),
            days: Some(vec![DayOfWeek::Monday, DayOfWeek::Friday]),
            extra: None,
        },
    ]
}

#[test]
fn full_schedule_fire_rearm_cycle() {
    let (engine, driver) = engine_with_driver();
    let (tx, mut rx) = mpsc::unbounded_channel();
    engine.channel().attach(tx);

    // Schedule: one one-time trigger plus two weekly expansions.
    engine.wakeup(morning_alarms()).unwrap();

    let scheduled = driver.scheduled.lock().unwrap().clone();
    assert_eq!(scheduled.len(), 3);
    assert_eq!(
        scheduled.iter().map(|s| s.0).collect::<Vec<_>>(),
        vec![10_020, 10_021, 10_022]
    );

    // Every registration emitted a `set` event with the resolved instant.
    for (_, at, _) in &scheduled {
        match rx.try_recv().unwrap() {
            WakeupEvent::Scheduled {
                alarm_type,
                alarm_date,
            } => {
                assert!(alarm_type == "onetime" || alarm_type == "daylist");
                assert_eq!(alarm_date, at.timestamp_millis());
            }
            other => panic!("expected scheduled event, got {other:?}"),
        }
    }

    // The one-time trigger lands at 07:30 local, today or tomorrow.
    let (_, at, payload) = &scheduled[0];
    assert_eq!((at.hour(), at.minute(), at.second()), (7, 30, 0));
    assert!(*at >= Local::now() - chrono::Duration::seconds(1));
    assert_eq!(payload.kind, AlarmKind::OneTime);
    assert_eq!(payload.extra, Some(serde_json::json!({"label": "coffee"})));

    // Weekly triggers land on their requested weekdays.
    assert_eq!(scheduled[1].1.weekday().num_days_from_sunday(), 1);
    assert_eq!(scheduled[2].1.weekday().num_days_from_sunday(), 5);

    // Fire the one-time alarm: the payload comes back on the channel.
    engine.notify_fired(scheduled[0].2.extra.clone());
    assert_eq!(
        rx.try_recv().unwrap(),
        WakeupEvent::Wakeup {
            extra: Some(serde_json::json!({"label": "coffee"}))
        }
    );

    // Replace with an empty list: everything cancels, boot re-arm disables.
    driver.cancelled.lock().unwrap().clear();
    engine.wakeup(vec![]).unwrap();
    let cancelled = driver.cancelled.lock().unwrap().clone();
    assert_eq!(cancelled.len(), 1 + 7 + 3);
    assert_eq!(driver.boot_rearm.lock().unwrap().last(), Some(&false));
    assert!(engine.alarms().unwrap().is_empty());
}

#[test]
fn restart_rearms_from_persisted_state() {
    let driver = Arc::new(RecordingDriver::default());

    // Shared on-disk state across two engine "processes".
    let dir = std::env::temp_dir().join(format!("wakeup-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let db_path = dir.join("rearm.db");
    let _ = std::fs::remove_file(&db_path);

    {
        let engine = WakeupEngine::new(
            Connection::open(&db_path).unwrap(),
            Arc::clone(&driver) as Arc<dyn AlarmDriver>,
        )
        .unwrap();
        engine.wakeup(morning_alarms()).unwrap();
    }

    driver.scheduled.lock().unwrap().clear();
    driver.cancelled.lock().unwrap().clear();

    // A fresh engine over the same database re-registers on startup without
    // a cancellation pass.
    let engine = WakeupEngine::new(
        Connection::open(&db_path).unwrap(),
        Arc::clone(&driver) as Arc<dyn AlarmDriver>,
    )
    .unwrap();
    engine.on_startup().unwrap();

    assert_eq!(driver.scheduled.lock().unwrap().len(), 3);
    assert!(driver.cancelled.lock().unwrap().is_empty());
    assert_eq!(engine.alarms().unwrap(), morning_alarms());

    let _ = std::fs::remove_file(&db_path);
}

#[test]
fn denied_capability_fails_but_preserves_the_stored_list() {
    let (engine, driver) = engine_with_driver();
    engine.wakeup(morning_alarms()).unwrap();

    driver.deny_exact.store(true, Ordering::SeqCst);
    assert!(engine.wakeup(morning_alarms()).is_err());
    assert_eq!(engine.alarms().unwrap(), morning_alarms());
}
