//! Doctor records and their three client-facing views.
//!
//! A doctor record is created by admin action only and owns the live slot
//! ledger. Three projections exist with different redactions:
//! - `DoctorProfile`: password stripped (admin listing, own profile)
//! - `DoctorListing`: password and email stripped (public list)
//! - `DoctorSnapshot`: password and ledger stripped (appointment embed)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::SlotLedger;
use crate::patient::Address;
use crate::store::Document;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Avatar reference handed out by the blob store.
    pub image: String,
    pub speciality: String,
    pub degree: String,
    /// Free-form experience label, e.g. "4 Years".
    pub experience: String,
    pub about: String,
    /// Consultation fee in the smallest currency unit.
    pub fees: u64,
    pub address: Address,
    /// Whether the doctor currently accepts bookings.
    pub available: bool,
    /// Live ledger of taken slots. The booking workflow is the only
    /// writer; it replaces the whole field on every mutation.
    pub slots_booked: SlotLedger,
    pub created_at: DateTime<Utc>,
}

/// Field bundle for creating a doctor; the admin handler validates it
/// before construction.
#[derive(Clone, Debug)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: u64,
    pub address: Address,
}

impl Doctor {
    /// New doctors start available with an empty ledger.
    pub fn new(fields: NewDoctor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            password_hash: fields.password_hash,
            image: fields.image,
            speciality: fields.speciality,
            degree: fields.degree,
            experience: fields.experience,
            about: fields.about,
            fees: fields.fees,
            address: fields.address,
            available: true,
            slots_booked: SlotLedger::new(),
            created_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> DoctorProfile {
        DoctorProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fees: self.fees,
            address: self.address.clone(),
            available: self.available,
            slots_booked: self.slots_booked.clone(),
            created_at: self.created_at,
        }
    }

    pub fn listing(&self) -> DoctorListing {
        DoctorListing {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fees: self.fees,
            address: self.address.clone(),
            available: self.available,
            slots_booked: self.slots_booked.clone(),
            created_at: self.created_at,
        }
    }

    /// Point-in-time copy embedded in appointments. Excludes the ledger:
    /// a stored copy would be stale the moment the next booking lands.
    pub fn snapshot(&self) -> DoctorSnapshot {
        DoctorSnapshot {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fees: self.fees,
            address: self.address.clone(),
            available: self.available,
            created_at: self.created_at,
        }
    }
}

impl Document for Doctor {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Doctor view without credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: u64,
    pub address: Address,
    pub available: bool,
    pub slots_booked: SlotLedger,
    pub created_at: DateTime<Utc>,
}

/// Doctor view for the public list; no email, no credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoctorListing {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: u64,
    pub address: Address,
    pub available: bool,
    pub slots_booked: SlotLedger,
    pub created_at: DateTime<Utc>,
}

/// Doctor view embedded in appointments; no credentials, no ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoctorSnapshot {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: u64,
    pub address: Address,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Doctor {
        Doctor::new(NewDoctor {
            name: "Dr. Amara".to_owned(),
            email: "amara@medibook.dev".to_owned(),
            password_hash: "salt$digest".to_owned(),
            image: "https://blobs.medibook.dev/a.png".to_owned(),
            speciality: "Dermatology".to_owned(),
            degree: "MBBS".to_owned(),
            experience: "4 Years".to_owned(),
            about: "Skin specialist".to_owned(),
            fees: 50,
            address: Address::default(),
        })
    }

    #[test]
    fn test_new_doctor_starts_available_with_empty_ledger() {
        let doctor = sample();
        assert!(doctor.available);
        assert!(doctor.slots_booked.is_empty());
    }

    #[test]
    fn test_views_redact_expected_fields() {
        let mut doctor = sample();
        doctor.slots_booked.reserve("10_5_2025", "10:00 AM").unwrap();

        let profile = serde_json::to_value(doctor.profile()).unwrap();
        assert!(profile.get("password_hash").is_none());
        assert!(profile.get("email").is_some());

        let listing = serde_json::to_value(doctor.listing()).unwrap();
        assert!(listing.get("password_hash").is_none());
        assert!(listing.get("email").is_none());

        let snapshot = serde_json::to_value(doctor.snapshot()).unwrap();
        assert!(snapshot.get("password_hash").is_none());
        assert!(snapshot.get("slots_booked").is_none());
    }
}
