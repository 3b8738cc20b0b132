//! Appointment workflow.
//!
//! Orchestrates booking, cancellation, completion and payment
//! confirmation by composing record-store reads/writes with slot-ledger
//! mutations. The ledger update is a read-modify-write: the doctor
//! record is read, the new ledger computed locally, and the whole field
//! written back. Two concurrent bookings for the same doctor can both
//! observe a free slot and both commit; that window is a known property
//! of the flow and is not closed here.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::appointment::Appointment;
use crate::error::{BookingError, BookingResult};
use crate::store::RecordStore;

/// Who is asking for a cancellation. Determines which ownership and
/// state guards apply:
/// - a patient may only cancel their own appointment, re-cancelling is
///   an idempotent re-write;
/// - a doctor may only cancel their own appointments and gets an
///   explicit already-cancelled error;
/// - admin cancels unconditionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelActor {
    Patient(Uuid),
    Doctor(Uuid),
    Admin,
}

/// Book a slot with a doctor for a patient.
///
/// Preconditions, checked in order: doctor exists, doctor accepts
/// bookings, the slot is free, patient exists. On success the
/// appointment is inserted carrying snapshots of both profiles, then the
/// updated ledger is written back to the doctor record.
pub fn book_appointment(
    store: &RecordStore,
    patient_id: Uuid,
    doctor_id: Uuid,
    slot_date: &str,
    slot_time: &str,
) -> BookingResult<Appointment> {
    let doctor = store
        .doctors
        .find_by_id(doctor_id)
        .ok_or(BookingError::DoctorNotFound)?;
    if !doctor.available {
        return Err(BookingError::DoctorUnavailable);
    }

    let mut slots = doctor.slots_booked.clone();
    if let Err(err) = slots.reserve(slot_date, slot_time) {
        warn!(%doctor_id, slot_date, slot_time, "booking conflict");
        return Err(err);
    }

    let patient = store
        .patients
        .find_by_id(patient_id)
        .ok_or(BookingError::PatientNotFound)?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        patient: patient.profile(),
        doctor: doctor.snapshot(),
        amount: doctor.fees,
        slot_date: slot_date.to_owned(),
        slot_time: slot_time.to_owned(),
        created_at: chrono::Utc::now(),
        cancelled: false,
        completed: false,
        paid: false,
    };
    store.appointments.insert(appointment.clone());

    // Whole-field replace; not atomic with the read at the top.
    store
        .doctors
        .update_by_id(doctor_id, |d| d.slots_booked = slots);

    info!(%doctor_id, %patient_id, slot_date, slot_time, "appointment booked");
    Ok(appointment)
}

/// Cancel an appointment on behalf of `actor`.
///
/// Sets the cancelled flag, then releases the slot from the doctor's
/// ledger. Releasing an already-released slot is a no-op, which is what
/// makes the patient path's missing already-cancelled guard harmless.
pub fn cancel_appointment(
    store: &RecordStore,
    actor: CancelActor,
    appointment_id: Uuid,
) -> BookingResult<Appointment> {
    let Some(appointment) = store.appointments.find_by_id(appointment_id) else {
        return Err(match actor {
            CancelActor::Doctor(_) => BookingError::DoctorMismatch,
            _ => BookingError::AppointmentNotFound,
        });
    };

    match actor {
        CancelActor::Patient(patient_id) => {
            if appointment.patient_id != patient_id {
                return Err(BookingError::UnauthorizedAction);
            }
        }
        CancelActor::Doctor(doctor_id) => {
            if appointment.doctor_id != doctor_id {
                return Err(BookingError::DoctorMismatch);
            }
            if appointment.cancelled {
                return Err(BookingError::AlreadyCancelled);
            }
        }
        CancelActor::Admin => {}
    }

    let updated = store
        .appointments
        .update_by_id(appointment_id, |a| a.cancelled = true)
        .ok_or(BookingError::AppointmentNotFound)?;
    release_slot(store, &appointment);

    info!(%appointment_id, ?actor, "appointment cancelled");
    Ok(updated)
}

/// Mark an appointment completed by its doctor and free its slot,
/// making the (doctor, date, time) triple re-bookable.
pub fn complete_appointment(
    store: &RecordStore,
    doctor_id: Uuid,
    appointment_id: Uuid,
) -> BookingResult<Appointment> {
    let appointment = store
        .appointments
        .find_by_id(appointment_id)
        .ok_or(BookingError::DoctorMismatch)?;
    if appointment.doctor_id != doctor_id {
        return Err(BookingError::DoctorMismatch);
    }
    if appointment.completed {
        return Err(BookingError::AlreadyCompleted);
    }

    let updated = store
        .appointments
        .update_by_id(appointment_id, |a| a.completed = true)
        .ok_or(BookingError::DoctorMismatch)?;
    release_slot(store, &appointment);

    info!(%appointment_id, %doctor_id, "appointment completed");
    Ok(updated)
}

/// Record that the payment collaborator reported success. Never touches
/// the ledger.
pub fn confirm_payment(store: &RecordStore, appointment_id: Uuid) -> BookingResult<Appointment> {
    store
        .appointments
        .update_by_id(appointment_id, |a| a.paid = true)
        .ok_or(BookingError::AppointmentNotFound)
}

/// Remove the appointment's slot from its doctor's ledger and persist.
/// A vanished doctor record leaves the ledger untouched.
fn release_slot(store: &RecordStore, appointment: &Appointment) {
    if let Some(doctor) = store.doctors.find_by_id(appointment.doctor_id) {
        let mut slots = doctor.slots_booked.clone();
        slots.release(&appointment.slot_date, &appointment.slot_time);
        store
            .doctors
            .update_by_id(appointment.doctor_id, |d| d.slots_booked = slots);
    }
}

pub fn appointments_for_patient(store: &RecordStore, patient_id: Uuid) -> Vec<Appointment> {
    store.appointments.find(|a| a.patient_id == patient_id)
}

pub fn appointments_for_doctor(store: &RecordStore, doctor_id: Uuid) -> Vec<Appointment> {
    store.appointments.find(|a| a.doctor_id == doctor_id)
}

/// Newest-first slice of at most five appointments for dashboards.
fn latest(appointments: &[Appointment]) -> Vec<Appointment> {
    appointments.iter().rev().take(5).cloned().collect()
}

/// Counts shown on the admin panel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub doctors: usize,
    pub patients: usize,
    pub appointments: usize,
    pub latest_appointments: Vec<Appointment>,
}

pub fn admin_dashboard(store: &RecordStore) -> AdminDashboard {
    let appointments = store.appointments.all();
    AdminDashboard {
        doctors: store.doctors.len(),
        patients: store.patients.len(),
        appointments: appointments.len(),
        latest_appointments: latest(&appointments),
    }
}

/// Counts shown on a doctor's panel. Earnings sum the fee of every
/// appointment that is completed or paid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoctorDashboard {
    pub earnings: u64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

pub fn doctor_dashboard(store: &RecordStore, doctor_id: Uuid) -> DoctorDashboard {
    let appointments = appointments_for_doctor(store, doctor_id);

    let earnings = appointments
        .iter()
        .filter(|a| a.completed || a.paid)
        .map(|a| a.amount)
        .sum();

    let mut patients: Vec<Uuid> = Vec::new();
    for appointment in &appointments {
        if !patients.contains(&appointment.patient_id) {
            patients.push(appointment.patient_id);
        }
    }

    DoctorDashboard {
        earnings,
        appointments: appointments.len(),
        patients: patients.len(),
        latest_appointments: latest(&appointments),
    }
}
