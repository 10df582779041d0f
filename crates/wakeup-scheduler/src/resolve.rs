//! Pure trigger-instant resolution. No I/O, no state: both functions are
//! deterministic given the time-of-day and `now`.

use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, TimeZone};

use crate::types::{DayOfWeek, TimeOfDay};

/// Compute the next one-time trigger for `time` at or after `now`.
///
/// Returns `None` when `time` has no hour (unresolvable spec) or the
/// hour/minute is out of range. The candidate is built on today's calendar
/// date at HH:MM:00 in `now`'s timezone; if that instant is strictly before
/// `now`, the date advances by exactly one day.
pub fn next_one_time<Tz: TimeZone>(time: &TimeOfDay, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let hour = time.hour?;
    let candidate = at_time_of_day(now.date_naive(), hour, time.minute, now)?;

    if candidate < *now {
        // Today's occurrence already passed — tomorrow, same time-of-day.
        at_time_of_day(now.date_naive() + Days::new(1), hour, time.minute, now)
    } else {
        Some(candidate)
    }
}

/// Compute the next weekly trigger for `time` on `day`, at or after `now`.
///
/// Day-delta arithmetic is calendar-only: the time-of-day fields are fixed
/// first, then the date advances by the number of days until the requested
/// weekday. When the requested weekday is today, the tie-break is governed
/// by "already passed": a candidate strictly before `now` pushes the
/// trigger a full week out, a candidate at or after `now` fires today.
pub fn next_weekly<Tz: TimeZone>(
    time: &TimeOfDay,
    day: DayOfWeek,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let hour = time.hour?;
    let today = now.date_naive();
    let current = i64::from(now.weekday().num_days_from_sunday());
    let target = i64::from(day.index());

    let days_until = if current > target {
        // e.g. current=thursday (4), target=monday (1): days to end of week,
        // then into the next one.
        (6 - current) + target + 1
    } else if current < target {
        target - current
    } else {
        let candidate = at_time_of_day(today, hour, time.minute, now)?;
        if *now > candidate {
            7
        } else {
            0
        }
    };

    at_time_of_day(today + Days::new(days_until as u64), hour, time.minute, now)
}

/// Build `date` at HH:MM:00.000 in `now`'s timezone.
///
/// `None` only for an out-of-range hour/minute. DST transitions never make
/// a present time-of-day unresolvable: a wall-clock time that occurs twice
/// (fall-back) maps to its first occurrence, and one that never occurs
/// (spring-forward gap) maps to the first valid instant after the gap,
/// probed in half-hour steps to cover sub-hour transition zones.
fn at_time_of_day<Tz: TimeZone>(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    let tz = now.timezone();

    match tz.from_local_datetime(&naive) {
        LocalResult::None => (1..=8).find_map(|step| {
            tz.from_local_datetime(&(naive + Duration::minutes(30 * step)))
                .earliest()
        }),
        result => result.earliest(),
    }
}
