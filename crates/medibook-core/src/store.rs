//! In-memory record store.
//!
//! A document-database stand-in:
//! three collections addressed by primary key or simple equality
//! predicates. Writes are atomic per document; there are no
//! cross-document transactions, and readers receive clones. Anything
//! resembling a read-modify-write sequence (the slot ledger update in
//! particular) happens above this layer and is deliberately not
//! serialized here.

use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::appointment::Appointment;
use crate::doctor::Doctor;
use crate::patient::Patient;

/// A stored document addressable by primary key.
pub trait Document: Clone {
    fn id(&self) -> Uuid;
}

/// One document collection. Documents keep insertion order, which the
/// dashboard "latest" views rely on.
pub struct Collection<T> {
    docs: RwLock<Vec<T>>,
}

impl<T: Document> Collection<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, doc: T) {
        self.write().push(doc);
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<T> {
        self.read().iter().find(|d| d.id() == id).cloned()
    }

    pub fn find_one(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.read().iter().find(|d| pred(d)).cloned()
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.read().iter().filter(|d| pred(d)).cloned().collect()
    }

    pub fn all(&self) -> Vec<T> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Apply `mutate` to the document with `id` under the write lock and
    /// return the updated copy. The whole closure runs atomically with
    /// respect to this one document's write.
    pub fn update_by_id(&self, id: Uuid, mutate: impl FnOnce(&mut T)) -> Option<T> {
        let mut docs = self.write();
        let doc = docs.iter_mut().find(|d| d.id() == id)?;
        mutate(doc);
        Some(doc.clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<T>> {
        self.docs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<T>> {
        self.docs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The three collections backing the whole system. This is the sole
/// point of shared mutable state across requests.
#[derive(Default)]
pub struct RecordStore {
    pub patients: Collection<Patient>,
    pub doctors: Collection<Doctor>,
    pub appointments: Collection<Appointment>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find_by_id() {
        let patients = Collection::new();
        let patient = Patient::new("Jan", "jan@example.com", "hash");
        let id = patient.id;
        patients.insert(patient);

        assert_eq!(patients.find_by_id(id).unwrap().email, "jan@example.com");
        assert!(patients.find_by_id(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_find_one_equality_filter() {
        let patients = Collection::new();
        patients.insert(Patient::new("Jan", "jan@example.com", "hash"));
        patients.insert(Patient::new("Ada", "ada@example.com", "hash"));

        let found = patients.find_one(|p| p.email == "ada@example.com").unwrap();
        assert_eq!(found.name, "Ada");
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let patients = Collection::new();
        for name in ["a", "b", "c"] {
            patients.insert(Patient::new(name, format!("{name}@x.io"), "hash"));
        }
        let names: Vec<_> = patients.all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_update_by_id_returns_updated_copy() {
        let patients = Collection::new();
        let patient = Patient::new("Jan", "jan@example.com", "hash");
        let id = patient.id;
        patients.insert(patient);

        let updated = patients
            .update_by_id(id, |p| p.phone = "12345".to_owned())
            .unwrap();
        assert_eq!(updated.phone, "12345");
        assert_eq!(patients.find_by_id(id).unwrap().phone, "12345");

        assert!(patients.update_by_id(Uuid::new_v4(), |_| {}).is_none());
    }
}
