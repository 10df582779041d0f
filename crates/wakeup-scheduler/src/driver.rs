use chrono::{DateTime, Local};

use crate::error::Result;
use crate::types::TriggerPayload;

/// Seam to the platform's alarm-firing primitive.
///
/// Implementations must be `Send + Sync` so the engine can be shared across
/// threads. All calls are synchronous and fail-fast: the engine performs no
/// internal retries, and a rejected call fails the whole scheduling pass.
///
/// `id` is a namespace key — scheduling under an identifier that already has
/// a pending registration must replace it, and cancelling an identifier with
/// no pending registration must be a no-op.
pub trait AlarmDriver: Send + Sync {
    /// Register a trigger to fire once at-or-after `at`, surviving
    /// low-power states. `payload` is handed back verbatim on fire.
    fn schedule(&self, id: i64, at: DateTime<Local>, payload: &TriggerPayload) -> Result<()>;

    /// Cancel any pending registration under `id`.
    fn cancel(&self, id: i64) -> Result<()>;

    /// Whether the exact-wakeup scheduling capability is currently granted.
    /// May be queried concurrently with a scheduling pass.
    fn can_schedule_exact(&self) -> bool;

    /// Toggle the boot-time re-arm switch the platform consults to decide
    /// whether to call `on_startup` after a device restart.
    fn set_boot_rearm(&self, enabled: bool) -> Result<()>;

    /// Halt any in-progress wakeup-handling session (ringing, playback).
    /// Does not touch future registrations.
    fn stop_session(&self) -> Result<()>;
}
