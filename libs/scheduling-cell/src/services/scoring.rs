// libs/scheduling-cell/src/services/scoring.rs
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;

use shared_models::Appointment;

use crate::models::{PreferenceProfile, SchedulingConfig, TimeSlot};

/// Score every candidate slot and return the top `top_k`, descending by
/// score with ties broken by earlier start time.
///
/// The score is additive:
/// - proximity to the caller's preferred instant (wrapped hour distance),
/// - the patient's historical weekday and hour affinities,
/// - a soft penalty when an existing booking starts near the slot,
/// - a morning bonus for local start hours before noon.
///
/// Nearby bookings only discourage a slot here; hard overlap exclusion is
/// the booking caller's job via the conflict check before final booking.
pub fn score_and_rank(
    slots: Vec<TimeSlot>,
    existing: &[Appointment],
    preferences: &PreferenceProfile,
    preferred_instant: Option<DateTime<Utc>>,
    zone: Tz,
    config: &SchedulingConfig,
    top_k: usize,
) -> Vec<TimeSlot> {
    let preferred_hour = preferred_instant.map(|t| t.with_timezone(&zone).hour() as i64);

    let mut scored: Vec<TimeSlot> = slots
        .into_iter()
        .map(|slot| {
            let score = score_slot(&slot, existing, preferences, preferred_hour, zone, config);
            TimeSlot { score, ..slot }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.start.cmp(&b.start))
    });
    scored.truncate(top_k);

    debug!("Ranked {} slots (top score {:?})", scored.len(), scored.first().map(|s| s.score));

    scored
}

fn score_slot(
    slot: &TimeSlot,
    existing: &[Appointment],
    preferences: &PreferenceProfile,
    preferred_hour: Option<i64>,
    zone: Tz,
    config: &SchedulingConfig,
) -> f64 {
    let local_start = slot.start.with_timezone(&zone);
    let hour = local_start.hour();
    let day_of_week = local_start.weekday().num_days_from_sunday();

    let mut score = 0.0;

    if let Some(preferred) = preferred_hour {
        let diff = (hour as i64 - preferred).abs();
        let wrapped = diff.min(24 - diff);
        score += (24 - wrapped) as f64 * config.preferred_time_weight;
    }

    score += preferences.day_count(day_of_week) as f64 * config.day_affinity_weight;
    score += preferences.hour_count(hour) as f64 * config.hour_affinity_weight;

    // Absolute time distance, not calendar proximity.
    let near_booking = existing.iter().filter(|a| a.is_active()).any(|a| {
        (a.start_time - slot.start).num_minutes().abs() <= config.near_conflict_window_minutes
    });
    if near_booking {
        score -= config.near_conflict_penalty;
    }

    if hour < 12 {
        score += config.morning_bonus;
    }

    score
}
