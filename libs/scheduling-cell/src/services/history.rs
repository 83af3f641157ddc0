// libs/scheduling-cell/src/services/history.rs
use chrono::{Datelike, Timelike};
use chrono_tz::Tz;
use tracing::debug;

use shared_models::Appointment;

use crate::models::PreferenceProfile;

/// Derive a patient's booking-preference distribution from their full
/// appointment history.
///
/// Weekday and hour are both taken from the appointment start in the
/// clinic's zone, so appointments logged from different client zones
/// land in consistent buckets. Empty history yields empty maps;
/// downstream scoring treats missing keys as zero weight.
pub fn analyze_preferences(history: &[Appointment], zone: Tz) -> PreferenceProfile {
    let mut profile = PreferenceProfile::default();

    for appointment in history {
        let local_start = appointment.start_time.with_timezone(&zone);
        let day_of_week = local_start.weekday().num_days_from_sunday();
        let hour = local_start.hour();

        *profile.by_day.entry(day_of_week).or_insert(0) += 1;
        *profile.by_hour.entry(hour).or_insert(0) += 1;
    }

    debug!(
        "Analyzed {} historical appointments into {} day buckets and {} hour buckets",
        history.len(),
        profile.by_day.len(),
        profile.by_hour.len()
    );

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared_models::AppointmentStatus;
    use uuid::Uuid;

    fn appointment_at(start: chrono::DateTime<Utc>) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(30),
            service_type: "general_consultation".to_string(),
            status: AppointmentStatus::Completed,
        }
    }

    #[test]
    fn test_empty_history_yields_empty_profile() {
        let profile = analyze_preferences(&[], chrono_tz::UTC);
        assert!(profile.is_empty());
    }

    #[test]
    fn test_counts_accumulate_per_bucket() {
        // Three Wednesdays at 14:00 UTC and one Friday at 9:00 UTC.
        let history = vec![
            appointment_at(Utc.with_ymd_and_hms(2025, 6, 4, 14, 0, 0).unwrap()),
            appointment_at(Utc.with_ymd_and_hms(2025, 6, 11, 14, 0, 0).unwrap()),
            appointment_at(Utc.with_ymd_and_hms(2025, 6, 18, 14, 0, 0).unwrap()),
            appointment_at(Utc.with_ymd_and_hms(2025, 6, 6, 9, 0, 0).unwrap()),
        ];

        let profile = analyze_preferences(&history, chrono_tz::UTC);
        assert_eq!(profile.day_count(3), 3); // Wednesday
        assert_eq!(profile.day_count(5), 1); // Friday
        assert_eq!(profile.hour_count(14), 3);
        assert_eq!(profile.hour_count(9), 1);
    }

    #[test]
    fn test_buckets_follow_the_clinic_zone() {
        // 20:00 UTC Tuesday is 01:30 Wednesday in Kolkata.
        let zone: Tz = "Asia/Kolkata".parse().unwrap();
        let history = vec![appointment_at(
            Utc.with_ymd_and_hms(2025, 6, 3, 20, 0, 0).unwrap(),
        )];

        let profile = analyze_preferences(&history, zone);
        assert_eq!(profile.day_count(3), 1); // Wednesday local
        assert_eq!(profile.hour_count(1), 1); // 01:30 local
    }
}
