// libs/scheduling-cell/src/services/suggestions.rs
use chrono::{Days, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{
    parse_timezone, ConflictCheckRequest, ConflictOutcome, SchedulingConfig, SchedulingError,
    SuggestionRequest, TimeSlot,
};
use crate::services::conflict::ConflictService;
use crate::services::history::analyze_preferences;
use crate::services::scoring::score_and_rank;
use crate::services::slots::generate_slots;
use crate::store::AppointmentStore;

/// Orchestrates smart slot suggestion: fetches the doctor's upcoming
/// bookings and the patient's history from the appointment store, then
/// runs generation, preference analysis and ranking over the snapshot.
///
/// Identical store snapshots and identical requests always yield the
/// same ranked list.
pub struct SuggestionService {
    store: Arc<dyn AppointmentStore>,
    config: SchedulingConfig,
    conflicts: ConflictService,
}

impl SuggestionService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self::with_config(store, SchedulingConfig::default())
    }

    pub fn with_config(store: Arc<dyn AppointmentStore>, config: SchedulingConfig) -> Self {
        let conflicts = ConflictService::with_config(Arc::clone(&store), config.clone());
        Self {
            store,
            config,
            conflicts,
        }
    }

    /// Produce ranked appointment suggestions over the search window
    /// starting at the requested date.
    ///
    /// Either store read failing aborts the whole request with
    /// `UpstreamUnavailable`; a partial ranking from incomplete data is
    /// never returned.
    pub async fn get_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        let duration = request
            .duration_minutes
            .unwrap_or(self.config.default_duration_minutes);
        if duration <= 0 {
            return Err(SchedulingError::InvalidArgument(format!(
                "appointment duration must be positive, got {} minutes",
                duration
            )));
        }

        let zone = parse_timezone(&request.timezone)?;
        let (window_start, window_end) = self.search_window(request, zone)?;
        let preferred_instant = self.preferred_instant(request, zone)?;

        debug!(
            "Fetching suggestion inputs for doctor {} / patient {} between {} and {}",
            request.doctor_id, request.patient_id, window_start, window_end
        );

        // The two reads are independent; fan out and join before scoring.
        let (doctor_appointments, patient_history) = tokio::try_join!(
            self.store
                .appointments_for_doctor(request.doctor_id, window_start, window_end),
            self.store.appointments_for_patient(request.patient_id),
        )
        .map_err(|e| {
            warn!("Aborting suggestions, appointment store failed: {}", e);
            SchedulingError::UpstreamUnavailable(e.to_string())
        })?;

        let preferences = analyze_preferences(&patient_history, zone);
        let slots = generate_slots(
            window_start,
            window_end,
            &request.business_hours,
            zone,
            duration,
        )?;

        Ok(score_and_rank(
            slots,
            &doctor_appointments,
            &preferences,
            preferred_instant,
            zone,
            &self.config,
            self.config.top_k,
        ))
    }

    /// Hard conflict check against the doctor's stored bookings, for use
    /// by the booking form before final confirmation.
    pub async fn check_conflict(
        &self,
        request: &ConflictCheckRequest,
    ) -> Result<ConflictOutcome, SchedulingError> {
        self.conflicts.check_for_doctor(request).await
    }

    /// Resolve the caller's preferred wall-clock time to an absolute
    /// instant. A preferred time that does not exist in the clinic zone
    /// on that date (DST gap) is rejected rather than silently ignored,
    /// so the proximity term never vanishes without the caller knowing.
    fn preferred_instant(
        &self,
        request: &SuggestionRequest,
        zone: Tz,
    ) -> Result<Option<chrono::DateTime<Utc>>, SchedulingError> {
        let Some(time) = request.preferred_time else {
            return Ok(None);
        };

        let instant = zone
            .from_local_datetime(&request.preferred_date.and_time(time))
            .earliest()
            .ok_or_else(|| {
                SchedulingError::InvalidArgument(format!(
                    "preferred time {} does not exist on {} in {}",
                    time, request.preferred_date, request.timezone
                ))
            })?
            .with_timezone(&Utc);

        Ok(Some(instant))
    }

    fn search_window(
        &self,
        request: &SuggestionRequest,
        zone: Tz,
    ) -> Result<(chrono::DateTime<Utc>, chrono::DateTime<Utc>), SchedulingError> {
        let start_naive = request
            .preferred_date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| {
                SchedulingError::InvalidArgument("preferred date is not representable".to_string())
            })?;
        let window_start = zone
            .from_local_datetime(&start_naive)
            .earliest()
            .ok_or_else(|| {
                SchedulingError::InvalidArgument(format!(
                    "midnight on {} does not exist in {}",
                    request.preferred_date, request.timezone
                ))
            })?
            .with_timezone(&Utc);

        let last_day = request
            .preferred_date
            .checked_add_days(Days::new(self.config.search_window_days.saturating_sub(1)))
            .ok_or_else(|| {
                SchedulingError::InvalidArgument("search window extends past representable dates".to_string())
            })?;
        let end_naive = last_day.and_hms_opt(23, 59, 59).ok_or_else(|| {
            SchedulingError::InvalidArgument("search window end is not representable".to_string())
        })?;
        let window_end = zone
            .from_local_datetime(&end_naive)
            .latest()
            .ok_or_else(|| {
                SchedulingError::InvalidArgument(format!(
                    "end of {} does not exist in {}",
                    last_day, request.timezone
                ))
            })?
            .with_timezone(&Utc);

        Ok((window_start, window_end))
    }
}
