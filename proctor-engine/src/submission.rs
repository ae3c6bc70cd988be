use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ExamError, Result};

/// Per-submission consensus state. The transition to `Finalized` is one-way:
/// once a quorum of validations exists, the submission never returns to
/// `AwaitingValidation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    AwaitingValidation,
    Finalized,
}

/// A single validator score appended to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub validator: String,
    /// Score in 0..=100.
    pub score: u8,
    pub validated_at: u64,
}

/// A student's answer submission for an exam.
///
/// Created once during the exam's active window; its validation sequence and
/// final score are mutated later by the consensus engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub exam_id: u64,
    pub student: String,
    /// Opaque digest of the submitted answers.
    #[serde(with = "hex")]
    pub answer_hash: [u8; 32],
    pub submitted_at: u64,
    pub validations: Vec<Validation>,
    /// Truncated mean of validator scores, set once quorum is reached.
    pub final_score: Option<u8>,
    pub status: SubmissionStatus,
}

/// Stores submissions, indexed by `(exam_id, student)`.
///
/// Enforces the one-submission-per-student-per-exam invariant; window and
/// registration rules live in the platform operation that drives it.
#[derive(Debug, Default, Clone)]
pub struct SubmissionStore {
    submissions: HashMap<(u64, String), Submission>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_submitted(&self, exam_id: u64, student: &str) -> bool {
        self.submissions
            .contains_key(&(exam_id, student.to_string()))
    }

    /// Retrieves a submission.
    ///
    /// # Errors
    /// Returns [`ExamError::SubmissionNotFound`] if the pair has none.
    pub fn find(&self, exam_id: u64, student: &str) -> Result<&Submission> {
        self.submissions
            .get(&(exam_id, student.to_string()))
            .ok_or_else(|| ExamError::SubmissionNotFound {
                exam_id,
                student: student.to_string(),
            })
    }

    pub(crate) fn find_mut(&mut self, exam_id: u64, student: &str) -> Result<&mut Submission> {
        self.submissions
            .get_mut(&(exam_id, student.to_string()))
            .ok_or_else(|| ExamError::SubmissionNotFound {
                exam_id,
                student: student.to_string(),
            })
    }

    /// Records a fresh submission at time `now`, with an empty validation
    /// sequence and no final score.
    ///
    /// # Errors
    /// Returns [`ExamError::AlreadySubmitted`] if the pair already exists.
    pub(crate) fn record(
        &mut self,
        exam_id: u64,
        student: &str,
        answer_hash: [u8; 32],
        now: u64,
    ) -> Result<()> {
        let key = (exam_id, student.to_string());
        if self.submissions.contains_key(&key) {
            return Err(ExamError::AlreadySubmitted {
                exam_id,
                student: student.to_string(),
            });
        }

        self.submissions.insert(
            key,
            Submission {
                exam_id,
                student: student.to_string(),
                answer_hash,
                submitted_at: now,
                validations: Vec::new(),
                final_score: None,
                status: SubmissionStatus::AwaitingValidation,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_starts_awaiting_validation() {
        let mut store = SubmissionStore::new();
        store.record(1, "alice", [9u8; 32], 1_200).unwrap();

        let submission = store.find(1, "alice").unwrap();
        assert_eq!(submission.status, SubmissionStatus::AwaitingValidation);
        assert!(submission.validations.is_empty());
        assert_eq!(submission.final_score, None);
        assert_eq!(submission.submitted_at, 1_200);
    }

    #[test]
    fn test_duplicate_submission_rejected() {
        let mut store = SubmissionStore::new();
        store.record(1, "alice", [1u8; 32], 1_200).unwrap();
        let err = store.record(1, "alice", [2u8; 32], 1_300).unwrap_err();
        assert_eq!(
            err,
            ExamError::AlreadySubmitted {
                exam_id: 1,
                student: "alice".to_string()
            }
        );
        // The first answer hash survives.
        assert_eq!(store.find(1, "alice").unwrap().answer_hash, [1u8; 32]);
    }

    #[test]
    fn test_find_unknown_submission_fails() {
        let store = SubmissionStore::new();
        assert_eq!(
            store.find(1, "ghost").unwrap_err(),
            ExamError::SubmissionNotFound {
                exam_id: 1,
                student: "ghost".to_string()
            }
        );
    }
}
