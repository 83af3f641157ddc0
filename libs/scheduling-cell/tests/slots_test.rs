// libs/scheduling-cell/tests/slots_test.rs
//
// Window generator properties: containment, no overlap, closed-day
// exclusion, and the concrete clinic-week scenario in Asia/Kolkata.

use chrono::{Datelike, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use scheduling_cell::{generate_slots, BusinessHours};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn kolkata() -> Tz {
    "Asia/Kolkata".parse().unwrap()
}

fn clinic_week_hours() -> BusinessHours {
    BusinessHours::weekdays(t(9, 0), t(17, 0)).unwrap()
}

#[test]
fn test_slots_stay_within_business_hours_and_duration() {
    let zone = kolkata();
    // Monday 2025-06-16 through Sunday 2025-06-22, local midnights.
    let start = zone.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap().to_utc();
    let end = zone.with_ymd_and_hms(2025, 6, 22, 23, 59, 59).unwrap().to_utc();

    let slots = generate_slots(start, end, &clinic_week_hours(), zone, 30).unwrap();
    assert!(!slots.is_empty());

    for slot in &slots {
        let local_start = slot.start.with_timezone(&zone);
        let local_end = slot.end.with_timezone(&zone);
        assert!(local_start.time() >= t(9, 0), "slot starts before opening");
        assert!(local_end.time() <= t(17, 0), "slot ends after closing");
        assert_eq!((slot.end - slot.start).num_minutes(), 30);
    }
}

#[test]
fn test_slots_on_a_day_never_overlap() {
    let zone = kolkata();
    let start = zone.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap().to_utc();
    let end = zone.with_ymd_and_hms(2025, 6, 22, 23, 59, 59).unwrap().to_utc();

    let slots = generate_slots(start, end, &clinic_week_hours(), zone, 30).unwrap();

    for pair in slots.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "slots {:?} and {:?} overlap",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_closed_weekend_contributes_no_slots() {
    let zone = kolkata();
    // Two full weeks.
    let start = zone.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap().to_utc();
    let end = zone.with_ymd_and_hms(2025, 6, 29, 23, 59, 59).unwrap().to_utc();

    let slots = generate_slots(start, end, &clinic_week_hours(), zone, 30).unwrap();
    assert!(!slots.is_empty());

    for slot in &slots {
        let weekday = slot.start.with_timezone(&zone).weekday().num_days_from_sunday();
        assert!(weekday >= 1 && weekday <= 5, "weekend slot generated");
    }
}

#[test]
fn test_monday_clinic_day_first_and_last_slot() {
    // Mon-Fri 09:00-17:00 in UTC+5:30, 30-minute slots, single Monday.
    let zone = kolkata();
    let start = zone.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap().to_utc();
    let end = zone.with_ymd_and_hms(2025, 6, 16, 23, 59, 59).unwrap().to_utc();

    let slots = generate_slots(start, end, &clinic_week_hours(), zone, 30).unwrap();

    // 09:00 to 17:00 holds exactly 16 half-hour slots.
    assert_eq!(slots.len(), 16);

    let first = slots.first().unwrap();
    assert_eq!(first.start, Utc.with_ymd_and_hms(2025, 6, 16, 3, 30, 0).unwrap());
    assert_eq!(first.start.with_timezone(&zone).time(), t(9, 0));

    let last = slots.last().unwrap();
    assert_eq!(last.start.with_timezone(&zone).time(), t(16, 30));
    assert_eq!(last.end.with_timezone(&zone).time(), t(17, 0));
}

#[test]
fn test_zero_length_range_yields_no_slots() {
    let zone = kolkata();
    let instant = zone.with_ymd_and_hms(2025, 6, 16, 12, 0, 0).unwrap().to_utc();

    let slots = generate_slots(instant, instant, &clinic_week_hours(), zone, 30).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn test_output_is_recomputable() {
    let zone = kolkata();
    let start = zone.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap().to_utc();
    let end = zone.with_ymd_and_hms(2025, 6, 20, 23, 59, 59).unwrap().to_utc();

    let first = generate_slots(start, end, &clinic_week_hours(), zone, 30).unwrap();
    let second = generate_slots(start, end, &clinic_week_hours(), zone, 30).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_odd_duration_fills_day_without_spill() {
    let zone = kolkata();
    let start = zone.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap().to_utc();
    let end = zone.with_ymd_and_hms(2025, 6, 16, 23, 59, 59).unwrap().to_utc();

    // 45-minute slots in an 8-hour day: 10 fit, 480 / 45 = 10.67.
    let slots = generate_slots(start, end, &clinic_week_hours(), zone, 45).unwrap();
    assert_eq!(slots.len(), 10);
    let last = slots.last().unwrap();
    assert!(last.end.with_timezone(&zone).time() <= t(17, 0));
    assert_eq!(last.start.with_timezone(&zone).time().hour(), 15);
}
