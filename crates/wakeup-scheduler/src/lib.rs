//! `wakeup-scheduler` — alarm scheduling engine with SQLite-persisted state.
//!
//! # Overview
//!
//! Callers hand the [`engine::WakeupEngine`] a list of alarm specs; the
//! engine cancels everything a previous pass registered, resolves each spec
//! to its next concrete trigger instant, registers the triggers with the
//! platform's [`driver::AlarmDriver`], and persists enough state to repeat
//! the cycle after a restart. Results (trigger registered, alarm fired,
//! session stopped) flow through a single-slot [`channel::ResultChannel`]
//! that buffers the latest result while no consumer is attached.
//!
//! # Alarm kinds
//!
//! | Kind      | Behaviour                                               |
//! |-----------|---------------------------------------------------------|
//! | `onetime` | Single fire at the next occurrence of HH:MM, local time |
//! | `daylist` | Weekly fire at HH:MM on each listed weekday             |
//!
//! Identifier allocation keeps two legacy bands cancellable so alarms
//! scheduled by previous format versions never leak across an upgrade; see
//! [`ids`].

pub mod channel;
pub mod driver;
pub mod engine;
pub mod error;
pub mod ids;
pub mod resolve;
pub mod store;
pub mod types;

pub use channel::ResultChannel;
pub use driver::AlarmDriver;
pub use engine::WakeupEngine;
pub use error::{Result, SchedulerError};
pub use types::{AlarmKind, AlarmOptions, AlarmSpec, DayOfWeek, TimeOfDay, TriggerPayload};
