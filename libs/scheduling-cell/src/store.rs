// libs/scheduling-cell/src/store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use shared_models::Appointment;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or errored. Callers must never
    /// collapse this into an empty result set.
    #[error("appointment store unreachable: {0}")]
    Unavailable(String),

    #[error("appointment store returned malformed data: {0}")]
    Malformed(String),
}

/// Read-only view of the external appointment store. Persistence itself
/// (create/update/delete, schema) lives outside this cell; the scheduling
/// core only ever queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// All appointments for a doctor whose time range touches
    /// `[start, end]`, ascending by start time.
    async fn appointments_for_doctor(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// A patient's full appointment history, ascending by start time.
    async fn appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, StoreError>;
}
