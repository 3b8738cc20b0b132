//! Per-doctor slot ledger.
//!
//! Tracks which time slots are already taken, keyed by calendar date.
//! The ledger is embedded in the doctor record and persisted back as a
//! whole-field replace by the booking workflow; it carries no notion of
//! who holds a slot, only that it is held.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, BookingResult};

/// Mapping from date key (`"DD_M_YYYY"`) to the time labels booked on
/// that date, in booking order.
///
/// Invariant: a date key is only present while it holds at least one
/// time; `release` removes the key once its last slot is freed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotLedger {
    slots: HashMap<String, Vec<String>>,
}

impl SlotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `time` on `date`.
    ///
    /// A missing date key is created with the single time; a present key
    /// gets the time appended, unless the exact slot is already held.
    pub fn reserve(&mut self, date: &str, time: &str) -> BookingResult<()> {
        match self.slots.get_mut(date) {
            Some(times) if times.iter().any(|t| t == time) => Err(BookingError::SlotTaken),
            Some(times) => {
                times.push(time.to_owned());
                Ok(())
            }
            None => {
                self.slots.insert(date.to_owned(), vec![time.to_owned()]);
                Ok(())
            }
        }
    }

    /// Free `time` on `date`.
    ///
    /// Removes the first occurrence and drops the date key when its
    /// sequence empties. Releasing a time that was never booked, or a
    /// date with no entry, is a no-op.
    pub fn release(&mut self, date: &str, time: &str) {
        if let Some(times) = self.slots.get_mut(date) {
            if let Some(pos) = times.iter().position(|t| t == time) {
                times.remove(pos);
            }
            if times.is_empty() {
                self.slots.remove(date);
            }
        }
    }

    pub fn is_booked(&self, date: &str, time: &str) -> bool {
        self.slots
            .get(date)
            .is_some_and(|times| times.iter().any(|t| t == time))
    }

    /// Booked times for `date`, in booking order.
    pub fn times_on(&self, date: &str) -> Option<&[String]> {
        self.slots.get(date).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_reserve_creates_date_entry() {
        let mut ledger = SlotLedger::new();
        ledger.reserve("10_5_2025", "10:00 AM").unwrap();
        assert_eq!(
            ledger.times_on("10_5_2025"),
            Some(&["10:00 AM".to_owned()][..])
        );
    }

    #[test]
    fn test_reserve_appends_in_booking_order() {
        let mut ledger = SlotLedger::new();
        ledger.reserve("10_5_2025", "11:00 AM").unwrap();
        ledger.reserve("10_5_2025", "09:00 AM").unwrap();
        ledger.reserve("10_5_2025", "10:00 AM").unwrap();
        assert_eq!(
            ledger.times_on("10_5_2025").unwrap(),
            &["11:00 AM", "09:00 AM", "10:00 AM"]
        );
    }

    #[test]
    fn test_reserve_conflict() {
        let mut ledger = SlotLedger::new();
        ledger.reserve("10_5_2025", "10:00 AM").unwrap();
        assert_eq!(
            ledger.reserve("10_5_2025", "10:00 AM"),
            Err(BookingError::SlotTaken)
        );
        // The conflicting attempt must not grow the sequence.
        assert_eq!(ledger.times_on("10_5_2025").unwrap().len(), 1);
    }

    #[test]
    fn test_release_removes_empty_date_key() {
        let mut ledger = SlotLedger::new();
        ledger.reserve("10_5_2025", "10:00 AM").unwrap();
        ledger.release("10_5_2025", "10:00 AM");
        assert!(ledger.is_empty());
        assert_eq!(ledger.times_on("10_5_2025"), None);
    }

    #[test]
    fn test_release_keeps_remaining_times() {
        let mut ledger = SlotLedger::new();
        ledger.reserve("10_5_2025", "10:00 AM").unwrap();
        ledger.reserve("10_5_2025", "11:00 AM").unwrap();
        ledger.release("10_5_2025", "10:00 AM");
        assert_eq!(ledger.times_on("10_5_2025").unwrap(), &["11:00 AM"]);
    }

    #[test]
    fn test_release_absent_time_is_noop() {
        let mut ledger = SlotLedger::new();
        ledger.reserve("10_5_2025", "10:00 AM").unwrap();
        ledger.release("10_5_2025", "04:00 PM");
        assert_eq!(ledger.times_on("10_5_2025").unwrap(), &["10:00 AM"]);
    }

    #[test]
    fn test_release_absent_date_is_noop() {
        let mut ledger = SlotLedger::new();
        ledger.release("1_1_2030", "10:00 AM");
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_rebook_after_release() {
        let mut ledger = SlotLedger::new();
        ledger.reserve("10_5_2025", "10:00 AM").unwrap();
        ledger.release("10_5_2025", "10:00 AM");
        assert!(ledger.reserve("10_5_2025", "10:00 AM").is_ok());
    }

    proptest! {
        /// Reserving then releasing the same slot restores the ledger to
        /// its previous shape, whatever was booked before.
        #[test]
        fn prop_release_undoes_reserve(
            booked in proptest::collection::vec(("[0-9]{1,2}_[0-9]{1,2}_2025", "[0-9]{1,2}:00 (AM|PM)"), 0..8),
            date in "[0-9]{1,2}_[0-9]{1,2}_2025",
            time in "[0-9]{1,2}:00 (AM|PM)",
        ) {
            let mut ledger = SlotLedger::new();
            for (d, t) in &booked {
                let _ = ledger.reserve(d, t);
            }
            let before = ledger.clone();
            if ledger.reserve(&date, &time).is_ok() {
                ledger.release(&date, &time);
            }
            prop_assert_eq!(ledger, before);
        }

        /// A date key never maps to an empty sequence.
        #[test]
        fn prop_no_empty_date_keys(
            ops in proptest::collection::vec((any::<bool>(), "[0-9]{1,2}_[0-9]{1,2}_2025", "[0-9]{1,2}:00 (AM|PM)"), 0..32),
        ) {
            let mut ledger = SlotLedger::new();
            let mut dates = Vec::new();
            for (book, date, time) in &ops {
                if *book {
                    let _ = ledger.reserve(date, time);
                } else {
                    ledger.release(date, time);
                }
                dates.push(date.clone());
            }
            for date in dates {
                if let Some(times) = ledger.times_on(&date) {
                    prop_assert!(!times.is_empty());
                }
            }
        }
    }
}
