//! Error taxonomy for the booking domain.
//!
//! Every variant's display string is the user-facing message the HTTP
//! layer places into the response envelope. Nothing here is fatal; the
//! handlers recover every error into `{success: false, message}`.

use thiserror::Error;

pub type BookingResult<T> = Result<T, BookingError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    /// Referenced doctor id does not resolve.
    #[error("Doctor does not exist")]
    DoctorNotFound,

    /// Doctor exists but has bookings switched off.
    #[error("Doctor not available")]
    DoctorUnavailable,

    /// The exact (date, time) pair is already held by a live appointment.
    #[error("Slot not available")]
    SlotTaken,

    /// Referenced patient id does not resolve.
    #[error("User does not exist")]
    PatientNotFound,

    /// Referenced appointment id does not resolve.
    #[error("Appointment not found")]
    AppointmentNotFound,

    /// Doctor-initiated operation on an appointment that is missing or
    /// belongs to a different doctor. The two cases share one message.
    #[error("Appointment not found or appointment doctor ID do not match")]
    DoctorMismatch,

    /// Patient-initiated operation on somebody else's appointment.
    #[error("Unauthorized action")]
    UnauthorizedAction,

    #[error("Appointment already cancelled")]
    AlreadyCancelled,

    #[error("Appointment already completed")]
    AlreadyCompleted,

    /// Payment requested for an appointment that is cancelled or gone.
    #[error("Appointment cancelled or not found")]
    NotPayable,
}
