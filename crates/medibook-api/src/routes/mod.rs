//! Dispatch layer: maps method+path to workflow operations.

pub mod admin;
pub mod doctor;
pub mod patient;
