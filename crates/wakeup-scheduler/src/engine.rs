use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use rusqlite::Connection;
use tracing::{debug, info};
use wakeup_core::config::WakeupConfig;
use wakeup_core::events::WakeupEvent;

use crate::{
    channel::ResultChannel,
    driver::AlarmDriver,
    error::{Result, SchedulerError},
    ids::{self, IdAllocator},
    resolve,
    store::AlarmStore,
    types::{AlarmKind, AlarmOptions, AlarmSpec, DayOfWeek, TriggerPayload},
};

struct Inner {
    store: AlarmStore,
    driver: Arc<dyn AlarmDriver>,
}

/// The scheduling coordinator: owns the persisted alarm state and drives
/// cancel → resolve → register → persist cycles against the alarm driver.
///
/// Every state-mutating operation serializes on one internal mutex, so at
/// most one scheduling generation is in flight at a time. The result channel
/// carries its own lock and is safe to use from the fire-callback path
/// concurrently with a pass.
pub struct WakeupEngine {
    inner: Mutex<Inner>,
    channel: Arc<ResultChannel>,
}

impl WakeupEngine {
    /// Create a new engine, initialising the DB schema if needed.
    pub fn new(conn: Connection, driver: Arc<dyn AlarmDriver>) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(Inner {
                store: AlarmStore::new(conn)?,
                driver,
            }),
            channel: Arc::new(ResultChannel::new()),
        })
    }

    /// Open the SQLite database at the configured path and build an engine
    /// on top of it.
    pub fn from_config(config: &WakeupConfig, driver: Arc<dyn AlarmDriver>) -> Result<Self> {
        let conn = Connection::open(&config.database.path)?;
        Self::new(conn, driver)
    }

    /// The delivery channel, for host-side attach/detach.
    pub fn channel(&self) -> Arc<ResultChannel> {
        Arc::clone(&self.channel)
    }

    /// Persist playback options, field by field: a present field replaces
    /// the stored value, an absent field clears it. Does not touch
    /// scheduling state.
    pub fn configure(&self, options: &AlarmOptions) -> Result<()> {
        let inner = self.inner.lock().unwrap();
        inner.store.save_options(options)?;
        debug!("alarm options persisted");
        Ok(())
    }

    /// Replace the alarm list and reschedule everything.
    ///
    /// One full scheduling generation: clear the buffered result, cancel all
    /// previously known identifiers, validate the new list, gate on the
    /// exact-wakeup capability, then persist / resolve / register / emit and
    /// store the new scheduled count.
    ///
    /// On a validation or permission error the old alarms stay cancelled and
    /// nothing new is scheduled; the persisted alarm list is left untouched.
    pub fn wakeup(&self, alarms: Vec<AlarmSpec>) -> Result<()> {
        self.channel.clear_pending();

        let inner = self.inner.lock().unwrap();
        cancel_all(&inner)?;
        validate(&alarms)?;

        if !alarms.is_empty() && !inner.driver.can_schedule_exact() {
            return Err(SchedulerError::PermissionDenied);
        }

        inner.store.save_alarms(&alarms)?;
        self.run_pass(&inner, &alarms)
    }

    /// Halt any in-progress wakeup-handling session. Future registrations
    /// are untouched — `wakeup(vec![])` is the way to cancel those.
    pub fn stop(&self) -> Result<()> {
        self.channel.clear_pending();
        let inner = self.inner.lock().unwrap();
        inner.driver.stop_session()
    }

    /// Re-arm from persisted state after a process or device restart.
    ///
    /// The driver's registrations were wiped by the restart, so there is no
    /// cancellation pass; the already-persisted alarm list is resolved and
    /// registered again.
    pub fn on_startup(&self) -> Result<()> {
        let inner = self.inner.lock().unwrap();
        let alarms = inner.store.load_alarms()?;
        info!(count = alarms.len(), "re-arming alarms from persisted state");

        if !alarms.is_empty() && !inner.driver.can_schedule_exact() {
            return Err(SchedulerError::PermissionDenied);
        }

        self.run_pass(&inner, &alarms)
    }

    /// Fire-callback surface: the alarm driver reported a trigger firing.
    pub fn notify_fired(&self, extra: Option<serde_json::Value>) {
        self.channel.deliver(WakeupEvent::Wakeup { extra });
    }

    /// Fire-callback surface: the wakeup-handling session was halted.
    pub fn notify_stopped(&self, extra: Option<serde_json::Value>) {
        self.channel.deliver(WakeupEvent::Stopped { extra });
    }

    /// The persisted alarm list.
    pub fn alarms(&self) -> Result<Vec<AlarmSpec>> {
        self.inner.lock().unwrap().store.load_alarms()
    }

    /// The persisted playback options.
    pub fn options(&self) -> Result<AlarmOptions> {
        self.inner.lock().unwrap().store.load_options()
    }

    // --- scheduling pass ---------------------------------------------------

    /// Resolve each spec, register the triggers in stored order (days in
    /// spec order within a daylist), persist the sequential-identifier
    /// count, and toggle the boot re-arm switch.
    fn run_pass(&self, inner: &Inner, alarms: &[AlarmSpec]) -> Result<()> {
        let now = Local::now();
        let mut ids = IdAllocator::new();

        for spec in alarms {
            match &spec.kind {
                AlarmKind::OneTime => {
                    let Some(time) = &spec.time else { continue };
                    if let Some(at) = resolve::next_one_time(time, &now) {
                        self.register(inner, &mut ids, spec, None, at)?;
                    }
                }
                AlarmKind::DayList => {
                    let (Some(time), Some(days)) = (&spec.time, &spec.days) else {
                        continue;
                    };
                    for day in days {
                        if let Some(at) = resolve::next_weekly(time, *day, &now) {
                            self.register(inner, &mut ids, spec, Some(*day), at)?;
                        }
                    }
                }
                AlarmKind::Unknown(kind) => {
                    debug!(kind, "skipping alarm with unrecognized kind");
                }
            }
        }

        inner.store.set_scheduled_count(ids.allocated())?;
        inner.driver.set_boot_rearm(!alarms.is_empty())?;
        info!(scheduled = ids.allocated(), "scheduling pass complete");
        Ok(())
    }

    fn register(
        &self,
        inner: &Inner,
        ids: &mut IdAllocator,
        spec: &AlarmSpec,
        day: Option<DayOfWeek>,
        at: DateTime<Local>,
    ) -> Result<()> {
        let payload = TriggerPayload {
            kind: spec.kind.clone(),
            extra: spec.extra.clone(),
            time: if day.is_some() { spec.time } else { None },
            day,
        };

        let id = ids.next_id();
        inner.driver.schedule(id, at, &payload)?;
        info!(id, at = %at, kind = spec.kind.as_str(), "alarm registered");

        self.channel.deliver(WakeupEvent::Scheduled {
            alarm_type: spec.kind.as_str().to_string(),
            alarm_date: at.timestamp_millis(),
        });
        Ok(())
    }
}

/// Cancel every identifier a previous run could have registered under: both
/// legacy bands plus the sequential range sized by the persisted count. The
/// count is read before any pass overwrites it.
fn cancel_all(inner: &Inner) -> Result<()> {
    let count = inner.store.scheduled_count()?;
    for id in ids::cancellation_ids(count) {
        debug!(id, "cancelling alarm");
        inner.driver.cancel(id)?;
    }
    Ok(())
}

/// Reject recognized specs that are missing required fields. Checked for the
/// whole list up front so a bad entry can never leave a partial pass behind.
fn validate(alarms: &[AlarmSpec]) -> Result<()> {
    for spec in alarms {
        match &spec.kind {
            AlarmKind::OneTime => {
                if spec.time.is_none() {
                    return Err(SchedulerError::InvalidAlarm("alarm missing time".into()));
                }
            }
            AlarmKind::DayList => {
                if spec.time.is_none() {
                    return Err(SchedulerError::InvalidAlarm("alarm missing time".into()));
                }
                if spec.days.is_none() {
                    return Err(SchedulerError::InvalidAlarm(
                        "daylist alarm missing days".into(),
                    ));
                }
            }
            AlarmKind::Unknown(_) => {}
        }
    }
    Ok(())
}
