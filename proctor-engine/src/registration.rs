use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ExamError, Result};

/// A student's registration for an exam. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub exam_id: u64,
    pub student: String,
    pub registered_at: u64,
}

/// Tracks registrations, indexed by `(exam_id, student)`.
///
/// The store itself enforces the one-registration-per-student-per-exam
/// invariant; the temporal and capacity rules live in the platform operation
/// that drives it.
#[derive(Debug, Default, Clone)]
pub struct RegistrationTracker {
    registrations: HashMap<(u64, String), Registration>,
}

impl RegistrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `student` holds a registration for `exam_id`.
    pub fn is_registered(&self, exam_id: u64, student: &str) -> bool {
        self.registrations
            .contains_key(&(exam_id, student.to_string()))
    }

    pub fn get(&self, exam_id: u64, student: &str) -> Option<&Registration> {
        self.registrations.get(&(exam_id, student.to_string()))
    }

    /// Number of registrations held for `exam_id`. Matches the exam's
    /// `current_participants` counter at all times.
    pub fn count_for(&self, exam_id: u64) -> usize {
        self.registrations
            .keys()
            .filter(|(id, _)| *id == exam_id)
            .count()
    }

    /// Records a registration at time `now`.
    ///
    /// # Errors
    /// Returns [`ExamError::AlreadyRegistered`] if the pair already exists.
    pub(crate) fn record(&mut self, exam_id: u64, student: &str, now: u64) -> Result<()> {
        let key = (exam_id, student.to_string());
        if self.registrations.contains_key(&key) {
            return Err(ExamError::AlreadyRegistered {
                exam_id,
                student: student.to_string(),
            });
        }

        self.registrations.insert(
            key,
            Registration {
                exam_id,
                student: student.to_string(),
                registered_at: now,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let mut tracker = RegistrationTracker::new();
        tracker.record(1, "alice", 100).unwrap();

        assert!(tracker.is_registered(1, "alice"));
        assert!(!tracker.is_registered(1, "bob"));
        assert!(!tracker.is_registered(2, "alice"));
        assert_eq!(tracker.get(1, "alice").unwrap().registered_at, 100);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut tracker = RegistrationTracker::new();
        tracker.record(1, "alice", 100).unwrap();
        let err = tracker.record(1, "alice", 101).unwrap_err();
        assert_eq!(
            err,
            ExamError::AlreadyRegistered {
                exam_id: 1,
                student: "alice".to_string()
            }
        );
        // The original record is untouched.
        assert_eq!(tracker.get(1, "alice").unwrap().registered_at, 100);
    }

    #[test]
    fn test_count_is_per_exam() {
        let mut tracker = RegistrationTracker::new();
        tracker.record(1, "alice", 100).unwrap();
        tracker.record(1, "bob", 100).unwrap();
        tracker.record(2, "alice", 100).unwrap();
        assert_eq!(tracker.count_for(1), 2);
        assert_eq!(tracker.count_for(2), 1);
        assert_eq!(tracker.count_for(3), 0);
    }
}
