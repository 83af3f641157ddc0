// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

// ==============================================================================
// BUSINESS HOURS
// ==============================================================================

/// Opening hours for a single weekday, in the clinic's local wall-clock time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// Weekly opening hours keyed by day of week (0 = Sunday .. 6 = Saturday).
/// A weekday with no entry is closed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessHours {
    days: HashMap<u32, DayHours>,
}

impl BusinessHours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set opening hours for a day of week (0 = Sunday .. 6 = Saturday).
    pub fn set_hours(
        &mut self,
        day_of_week: u32,
        open: NaiveTime,
        close: NaiveTime,
    ) -> Result<(), SchedulingError> {
        if day_of_week > 6 {
            return Err(SchedulingError::InvalidArgument(format!(
                "day of week must be between 0 (Sunday) and 6 (Saturday), got {}",
                day_of_week
            )));
        }
        if open >= close {
            return Err(SchedulingError::InvalidArgument(format!(
                "opening time {} must be before closing time {}",
                open, close
            )));
        }
        self.days.insert(day_of_week, DayHours { open, close });
        Ok(())
    }

    /// Mark a day of week as closed, removing any hours set for it.
    pub fn set_closed(&mut self, day_of_week: u32) {
        self.days.remove(&day_of_week);
    }

    pub fn hours_for(&self, weekday: Weekday) -> Option<DayHours> {
        self.days.get(&weekday.num_days_from_sunday()).copied()
    }

    pub fn is_open_on(&self, weekday: Weekday) -> bool {
        self.hours_for(weekday).is_some()
    }

    /// Same hours Monday through Friday, weekend closed.
    pub fn weekdays(open: NaiveTime, close: NaiveTime) -> Result<Self, SchedulingError> {
        let mut hours = Self::new();
        for day_of_week in 1..=5 {
            hours.set_hours(day_of_week, open, close)?;
        }
        Ok(hours)
    }
}

// ==============================================================================
// SUGGESTION MODELS
// ==============================================================================

/// A candidate bookable interval. Ephemeral suggestion data, never persisted.
/// The score is zero until the slot has passed through ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub score: f64,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            score: 0.0,
        }
    }
}

/// Per-patient historical booking distribution, derived fresh on every
/// suggestion request. Keys are day of week (0 = Sunday) and hour of day
/// (0-23) in the clinic's zone; a missing key means zero weight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub by_day: HashMap<u32, u32>,
    pub by_hour: HashMap<u32, u32>,
}

impl PreferenceProfile {
    pub fn day_count(&self, day_of_week: u32) -> u32 {
        self.by_day.get(&day_of_week).copied().unwrap_or(0)
    }

    pub fn hour_count(&self, hour: u32) -> u32 {
        self.by_hour.get(&hour).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty() && self.by_hour.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub preferred_date: NaiveDate,
    pub preferred_time: Option<NaiveTime>,
    /// Defaults to `SchedulingConfig::default_duration_minutes` when absent.
    pub duration_minutes: Option<i64>,
    /// IANA zone name of the clinic, e.g. "Asia/Kolkata".
    pub timezone: String,
    pub business_hours: BusinessHours,
}

// ==============================================================================
// CONFLICT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckRequest {
    pub doctor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// When rescheduling, the appointment being edited so it does not
    /// conflict with its own prior record.
    pub exclude_appointment_id: Option<Uuid>,
}

/// Outcome of a conflict check. Conflict-free is a normal result, not an
/// error; a check that could not be completed is reported as
/// `SchedulingError::ConflictCheckUnavailable` instead of either variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConflictOutcome {
    pub conflict: bool,
    pub message: Option<String>,
}

impl ConflictOutcome {
    pub fn clear() -> Self {
        Self {
            conflict: false,
            message: None,
        }
    }

    pub fn detected(message: impl Into<String>) -> Self {
        Self {
            conflict: true,
            message: Some(message.into()),
        }
    }
}

// ==============================================================================
// POLICY CONFIGURATION
// ==============================================================================

/// Tunable scheduling policy. The defaults carry the clinic's standing
/// policy constants; deployments override them through configuration
/// rather than by editing the scoring code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Minimum gap required between two distinct appointments for the
    /// same doctor before they are flagged as conflicting.
    pub buffer_minutes: i64,
    /// Soft-penalty window: an existing appointment starting within this
    /// many minutes of a candidate slot discourages the slot.
    pub near_conflict_window_minutes: i64,
    pub preferred_time_weight: f64,
    pub day_affinity_weight: f64,
    pub hour_affinity_weight: f64,
    pub near_conflict_penalty: f64,
    pub morning_bonus: f64,
    pub top_k: usize,
    pub search_window_days: u64,
    pub default_duration_minutes: i64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: 60,
            near_conflict_window_minutes: 60,
            preferred_time_weight: 2.0,
            day_affinity_weight: 1.5,
            hour_affinity_weight: 2.0,
            near_conflict_penalty: 5.0,
            morning_bonus: 3.0,
            top_k: 5,
            search_window_days: 7,
            default_duration_minutes: 30,
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum SchedulingError {
    /// Malformed input. Failed fast, never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The external appointment store could not be reached; suggestion
    /// generation aborts rather than ranking from partial data.
    #[error("Appointment store unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The conflict check could not be completed. Distinct from "no
    /// conflict found": callers must render this as "unable to verify".
    #[error("Conflict check could not be completed: {0}")]
    ConflictCheckUnavailable(String),
}

/// Resolve a clinic zone name to a concrete time zone.
pub fn parse_timezone(name: &str) -> Result<Tz, SchedulingError> {
    name.parse::<Tz>()
        .map_err(|_| SchedulingError::InvalidArgument(format!("unknown time zone: {}", name)))
}
