// libs/scheduling-cell/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use scheduling_cell::store::{AppointmentStore, StoreError};
use shared_models::{Appointment, AppointmentStatus};

pub fn booking(
    doctor_id: Uuid,
    patient_id: Uuid,
    start: DateTime<Utc>,
    minutes: i64,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        doctor_id,
        patient_id,
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        service_type: "general_consultation".to_string(),
        status,
    }
}

/// Fixed snapshot of the appointment store for deterministic tests.
#[derive(Default)]
pub struct InMemoryStore {
    pub appointments: Vec<Appointment>,
}

impl InMemoryStore {
    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn appointments_for_doctor(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.start_time <= end && a.end_time >= start)
            .cloned()
            .collect())
    }

    async fn appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }
}

/// Store whose every read fails, for exercising unavailability paths.
pub struct FailingStore;

#[async_trait]
impl AppointmentStore for FailingStore {
    async fn appointments_for_doctor(
        &self,
        _doctor_id: Uuid,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    async fn appointments_for_patient(
        &self,
        _patient_id: Uuid,
    ) -> Result<Vec<Appointment>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}
