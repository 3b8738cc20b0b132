//! Medibook domain layer.
//!
//! Building blocks of the appointment booking backend:
//! - In-memory record store (three document collections)
//! - Per-doctor slot ledger bookkeeping
//! - Appointment workflow (book / cancel / complete / confirm payment)
//! - Error taxonomy shared with the HTTP layer
//!
//! This crate is transport-agnostic: no HTTP, no configuration, no
//! collaborator I/O. The `medibook-api` crate wires it to the outside
//! world.

pub mod appointment;
pub mod booking;
pub mod doctor;
pub mod error;
pub mod ledger;
pub mod patient;
pub mod store;

pub use appointment::Appointment;
pub use booking::{AdminDashboard, CancelActor, DoctorDashboard};
pub use doctor::{Doctor, DoctorListing, DoctorProfile, DoctorSnapshot, NewDoctor};
pub use error::{BookingError, BookingResult};
pub use ledger::SlotLedger;
pub use patient::{Address, Patient, PatientProfile};
pub use store::{Collection, Document, RecordStore};
