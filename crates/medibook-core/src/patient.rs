//! Patient accounts and their public view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// Placeholder avatar assigned at registration, replaced once the patient
/// uploads a picture through the blob store.
pub const DEFAULT_AVATAR: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

/// Postal address as two free-form lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: String,
}

/// A registered patient account.
///
/// Created at registration with name, email and password hash; the
/// remaining profile fields start as placeholders and are filled in by
/// profile updates. Patient records are never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Avatar reference: a hosted URL or an inline `data:` image.
    pub image: String,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            image: DEFAULT_AVATAR.to_owned(),
            phone: "000000000".to_owned(),
            dob: "Not Selected".to_owned(),
            gender: "Not Selected".to_owned(),
            address: Address::default(),
            created_at: Utc::now(),
        }
    }

    /// View with the password hash stripped; safe to return to clients
    /// and to embed in appointment snapshots.
    pub fn profile(&self) -> PatientProfile {
        PatientProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            phone: self.phone.clone(),
            dob: self.dob.clone(),
            gender: self.gender.clone(),
            address: self.address.clone(),
            created_at: self.created_at,
        }
    }
}

impl Document for Patient {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Patient profile without credentials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_strips_password_hash() {
        let patient = Patient::new("Jan", "jan@example.com", "salt$digest");
        let json = serde_json::to_value(patient.profile()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "jan@example.com");
    }

    #[test]
    fn test_new_patient_defaults() {
        let patient = Patient::new("Jan", "jan@example.com", "salt$digest");
        assert_eq!(patient.gender, "Not Selected");
        assert_eq!(patient.dob, "Not Selected");
        assert_eq!(patient.image, DEFAULT_AVATAR);
    }
}
