use std::collections::HashMap;

use super::model::{Exam, ExamParams};
use crate::error::{ExamError, Result};

/// In-memory registry of exams, indexed by `exam_id`.
///
/// Owns the identifier counter: ids are assigned sequentially starting at 1
/// and never reused, even if a later exam is deactivated. Lookups are point
/// lookups, never scans.
#[derive(Debug, Default, Clone)]
pub struct ExamRegistry {
    exams: HashMap<u64, Exam>,
    next_id: u64,
}

impl ExamRegistry {
    /// Creates a new, empty exam registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a new exam owned by `examiner` and returns its id.
    ///
    /// The exam starts active with zero participants. No duplicate-title or
    /// overlap checks are performed; simultaneous exams are permitted.
    pub fn create(&mut self, examiner: &str, params: ExamParams) -> u64 {
        self.next_id += 1;
        let exam_id = self.next_id;

        let exam = Exam {
            exam_id,
            title: params.title,
            content_hash: params.content_hash,
            start_time: params.start_time,
            duration: params.duration,
            registration_deadline: params.registration_deadline,
            max_participants: params.max_participants,
            current_participants: 0,
            minimum_validators: params.minimum_validators,
            examiner: examiner.to_string(),
            is_active: true,
            passing_score: params.passing_score,
        };
        self.exams.insert(exam_id, exam);
        exam_id
    }

    /// Retrieves an exam by id.
    ///
    /// # Errors
    /// Returns [`ExamError::ExamNotFound`] if no exam has that identifier.
    pub fn get(&self, exam_id: u64) -> Result<&Exam> {
        self.exams.get(&exam_id).ok_or(ExamError::ExamNotFound(exam_id))
    }

    pub fn exists(&self, exam_id: u64) -> bool {
        self.exams.contains_key(&exam_id)
    }

    /// Marks an exam inactive. The record itself is never deleted and its id
    /// is never reassigned.
    ///
    /// # Errors
    /// - [`ExamError::ExamNotFound`] if the exam does not exist.
    /// - [`ExamError::ExamInactive`] if it was already deactivated.
    pub(crate) fn deactivate(&mut self, exam_id: u64) -> Result<()> {
        let exam = self
            .exams
            .get_mut(&exam_id)
            .ok_or(ExamError::ExamNotFound(exam_id))?;
        if !exam.is_active {
            return Err(ExamError::ExamInactive(exam_id));
        }
        exam.is_active = false;
        Ok(())
    }

    /// Bumps the participant counter. Invoked only by the registration path
    /// after all registration preconditions have passed.
    pub(crate) fn increment_participants(&mut self, exam_id: u64) -> Result<()> {
        let exam = self
            .exams
            .get_mut(&exam_id)
            .ok_or(ExamError::ExamNotFound(exam_id))?;
        exam.current_participants += 1;
        Ok(())
    }
}
