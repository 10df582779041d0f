//! Alarm identifier allocation.
//!
//! Three disjoint bands. Only the sequential band is written by the current
//! format; the two legacy bands are fixed ranges that previous software
//! versions may have scheduled under, and they must stay cancellable after
//! an upgrade. Do not fold the bands together.

/// Single identifier the legacy format used for its one-time alarm.
pub const LEGACY_ONETIME_ID: i64 = 10_000;

/// First of seven identifiers the legacy format used for weekday alarms
/// (one per weekday, sunday = +0 … saturday = +6).
pub const LEGACY_DAYLIST_BASE: i64 = 10_010;

/// Base of the current sequential band: one identifier per resolved trigger,
/// assigned in resolution order.
pub const SEQUENTIAL_BASE: i64 = 10_020;

const LEGACY_DAYLIST_COUNT: i64 = 7;

/// The full identifier set a cancellation pass must cover: both legacy bands
/// plus the sequential identifiers used by the most recent scheduling pass.
pub fn cancellation_ids(scheduled_count: u32) -> Vec<i64> {
    let mut ids = Vec::with_capacity(1 + LEGACY_DAYLIST_COUNT as usize + scheduled_count as usize);
    ids.push(LEGACY_ONETIME_ID);
    ids.extend((0..LEGACY_DAYLIST_COUNT).map(|i| LEGACY_DAYLIST_BASE + i));
    ids.extend((0..i64::from(scheduled_count)).map(|i| SEQUENTIAL_BASE + i));
    ids
}

/// Hands out sequential identifiers for one scheduling pass.
#[derive(Debug, Default)]
pub struct IdAllocator {
    used: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier in the sequential band.
    pub fn next_id(&mut self) -> i64 {
        let id = SEQUENTIAL_BASE + i64::from(self.used);
        self.used += 1;
        id
    }

    /// Number of identifiers handed out so far — persisted as the
    /// scheduled count for the next cancellation pass.
    pub fn allocated(&self) -> u32 {
        self.used
    }
}
