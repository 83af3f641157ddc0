// libs/scheduling-cell/src/services/conflict.rs
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::Appointment;

use crate::models::{ConflictCheckRequest, ConflictOutcome, SchedulingConfig, SchedulingError};
use crate::store::AppointmentStore;

/// Check a proposed interval against a doctor's existing appointments.
///
/// Two intervals conflict if they overlap at all, or if the gap between
/// them is below `buffer_minutes`. The comparison uses absolute instants
/// only. `exclude_appointment_id` removes the appointment being edited
/// from the comparison set so a reschedule never conflicts with its own
/// prior record. Cancelled and no-show bookings are ignored.
pub fn check_interval(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Appointment],
    exclude_appointment_id: Option<Uuid>,
    buffer_minutes: i64,
) -> Result<ConflictOutcome, SchedulingError> {
    if start >= end {
        return Err(SchedulingError::InvalidArgument(format!(
            "proposed start {} must be before proposed end {}",
            start, end
        )));
    }

    let buffer = Duration::minutes(buffer_minutes);

    for appointment in existing {
        if Some(appointment.id) == exclude_appointment_id {
            continue;
        }
        if !appointment.is_active() {
            continue;
        }

        // Overlap: start1 < end2 AND start2 < end1
        if start < appointment.end_time && appointment.start_time < end {
            warn!(
                "Proposed interval {} - {} overlaps appointment {}",
                start, end, appointment.id
            );
            return Ok(ConflictOutcome::detected(format!(
                "Overlaps an existing appointment from {} to {}",
                appointment.start_time, appointment.end_time
            )));
        }

        let gap = if start >= appointment.end_time {
            start - appointment.end_time
        } else {
            appointment.start_time - end
        };

        if gap < buffer {
            warn!(
                "Proposed interval {} - {} is within the {} minute buffer of appointment {}",
                start, end, buffer_minutes, appointment.id
            );
            return Ok(ConflictOutcome::detected(format!(
                "Leaves only {} minutes before/after the appointment at {}; at least {} required",
                gap.num_minutes(),
                appointment.start_time,
                buffer_minutes
            )));
        }
    }

    Ok(ConflictOutcome::clear())
}

/// Store-backed conflict checking for a doctor.
pub struct ConflictService {
    store: Arc<dyn AppointmentStore>,
    config: SchedulingConfig,
}

impl ConflictService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self::with_config(store, SchedulingConfig::default())
    }

    pub fn with_config(store: Arc<dyn AppointmentStore>, config: SchedulingConfig) -> Self {
        Self { store, config }
    }

    /// Fetch the doctor's bookings around the proposed interval and run the
    /// conflict check against them.
    ///
    /// A store failure surfaces as `ConflictCheckUnavailable`, never as a
    /// clear result: "could not verify" and "slot is free" are different
    /// answers.
    pub async fn check_for_doctor(
        &self,
        request: &ConflictCheckRequest,
    ) -> Result<ConflictOutcome, SchedulingError> {
        if request.start_time >= request.end_time {
            return Err(SchedulingError::InvalidArgument(format!(
                "proposed start {} must be before proposed end {}",
                request.start_time, request.end_time
            )));
        }

        debug!(
            "Checking conflicts for doctor {} from {} to {}",
            request.doctor_id, request.start_time, request.end_time
        );

        // Widen the fetch window by the buffer so near misses are visible.
        let buffer = Duration::minutes(self.config.buffer_minutes);
        let existing = self
            .store
            .appointments_for_doctor(
                request.doctor_id,
                request.start_time - buffer,
                request.end_time + buffer,
            )
            .await
            .map_err(|e| SchedulingError::ConflictCheckUnavailable(e.to_string()))?;

        check_interval(
            request.start_time,
            request.end_time,
            &existing,
            request.exclude_appointment_id,
            self.config.buffer_minutes,
        )
    }
}

/// Debounced conflict checking for a live booking form.
///
/// Every keystroke-level edit submits a fresh check; only the latest
/// submission for the form instance produces an outcome. A superseded
/// check resolves to `None` so a stale response can never be applied
/// over a newer one.
pub struct DebouncedConflictChecker {
    service: Arc<ConflictService>,
    debounce: std::time::Duration,
    generation: AtomicU64,
}

impl DebouncedConflictChecker {
    pub fn new(service: Arc<ConflictService>, debounce: std::time::Duration) -> Self {
        Self {
            service,
            debounce,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn submit(
        &self,
        request: ConflictCheckRequest,
    ) -> Option<Result<ConflictOutcome, SchedulingError>> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != token {
            debug!("Conflict check superseded before it started");
            return None;
        }

        let result = self.service.check_for_doctor(&request).await;

        if self.generation.load(Ordering::SeqCst) != token {
            debug!("Conflict check superseded while in flight, discarding result");
            return None;
        }

        Some(result)
    }
}
