// libs/scheduling-cell/src/services/slots.rs
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::models::{BusinessHours, SchedulingError, TimeSlot};

/// Generate every bookable slot of `duration_minutes` inside business hours
/// for each local calendar day in `[range_start, range_end]` (inclusive,
/// evaluated in `zone`).
///
/// Slots are consecutive and non-overlapping within a day, never spill past
/// closing time, and come back ascending by start time. The output is a
/// pure function of the inputs, so it can be recomputed at will.
/// A zero-length range produces nothing; an inverted range is rejected.
pub fn generate_slots(
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    hours: &BusinessHours,
    zone: Tz,
    duration_minutes: i64,
) -> Result<Vec<TimeSlot>, SchedulingError> {
    if duration_minutes <= 0 {
        return Err(SchedulingError::InvalidArgument(format!(
            "slot duration must be positive, got {} minutes",
            duration_minutes
        )));
    }
    if range_start > range_end {
        return Err(SchedulingError::InvalidArgument(format!(
            "range start {} is after range end {}",
            range_start, range_end
        )));
    }
    if range_start == range_end {
        return Ok(Vec::new());
    }

    let duration = Duration::minutes(duration_minutes);
    let first_day = range_start.with_timezone(&zone).date_naive();
    let last_day = range_end.with_timezone(&zone).date_naive();

    let mut slots = Vec::new();
    let mut day = first_day;

    while day <= last_day {
        if let Some(day_hours) = hours.hours_for(day.weekday()) {
            let close = day.and_time(day_hours.close);
            let mut cursor = day.and_time(day_hours.open);

            while cursor + duration <= close {
                // Resolve local wall-clock to an absolute instant through the
                // clinic zone. A start that falls into a DST gap is skipped;
                // an ambiguous one takes the earliest mapping.
                let start = zone.from_local_datetime(&cursor).earliest();
                let end = zone.from_local_datetime(&(cursor + duration)).earliest();

                if let (Some(start), Some(end)) = (start, end) {
                    slots.push(TimeSlot::new(
                        start.with_timezone(&Utc),
                        end.with_timezone(&Utc),
                    ));
                }

                cursor += duration;
            }
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    debug!(
        "Generated {} slots of {} minutes between {} and {}",
        slots.len(),
        duration_minutes,
        first_day,
        last_day
    );

    Ok(slots)
}
