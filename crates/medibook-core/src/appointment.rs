//! Appointment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::doctor::DoctorSnapshot;
use crate::patient::PatientProfile;
use crate::store::Document;

/// A booked consultation.
///
/// Carries value copies of both profiles as they stood at booking time,
/// so the historical record survives later edits to the live doctor and
/// patient records. The three flags are independent and monotone: they
/// only ever move from `false` to `true`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    /// Patient profile at booking time.
    pub patient: PatientProfile,
    /// Doctor profile at booking time, without the slot ledger.
    pub doctor: DoctorSnapshot,
    /// Fee charged, copied from the doctor's fee at booking time.
    pub amount: u64,
    pub slot_date: String,
    pub slot_time: String,
    pub created_at: DateTime<Utc>,
    pub cancelled: bool,
    pub completed: bool,
    pub paid: bool,
}

impl Document for Appointment {
    fn id(&self) -> Uuid {
        self.id
    }
}
