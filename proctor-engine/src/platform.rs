use proctor_common::auth::roles::{Role, RoleRegistry};
use proctor_common::crypto::fingerprint::to_hex;
use tracing::info;

use crate::consensus;
use crate::error::{ExamError, Result};
use crate::events::{EventSink, LogSink, PlatformEvent};
use crate::exam::model::{ExamDetails, ExamParams};
use crate::exam::registry::ExamRegistry;
use crate::registration::RegistrationTracker;
use crate::submission::{Submission, SubmissionStore};

/// The platform-wide repository owning every entity collection, plus the
/// role registry and the event sink.
///
/// Constructed once at process start and passed into each operation by the
/// caller; `&mut self` on every mutating operation gives the single-writer
/// semantics the engine assumes. Each operation reads its timestamp from the
/// explicit `now` argument, checks every precondition before touching any
/// state, and either fully applies or fully rejects — a failed call leaves
/// no partial effects behind.
pub struct Platform {
    roles: RoleRegistry,
    exams: ExamRegistry,
    registrations: RegistrationTracker,
    submissions: SubmissionStore,
    sink: Box<dyn EventSink>,
}

impl Platform {
    /// Creates a platform seeded with `root_admin` as the first
    /// administrator, publishing events into `sink`.
    pub fn new(root_admin: &str, sink: Box<dyn EventSink>) -> Self {
        Self {
            roles: RoleRegistry::new(root_admin),
            exams: ExamRegistry::new(),
            registrations: RegistrationTracker::new(),
            submissions: SubmissionStore::new(),
            sink,
        }
    }

    /// Convenience constructor wiring the tracing-backed sink.
    pub fn with_log_sink(root_admin: &str) -> Self {
        Self::new(root_admin, Box::new(LogSink))
    }

    // --- Role administration (Administrator only) ---

    /// Grants `role` to `identity`. Requires the Administrator role.
    pub fn grant_role(&mut self, caller: &str, identity: &str, role: Role) -> Result<()> {
        self.roles.grant(caller, identity, role)?;
        info!(identity, %role, "role granted");
        Ok(())
    }

    /// Revokes `role` from `identity`. Requires the Administrator role.
    pub fn revoke_role(&mut self, caller: &str, identity: &str, role: Role) -> Result<()> {
        self.roles.revoke(caller, identity, role)?;
        info!(identity, %role, "role revoked");
        Ok(())
    }

    pub fn has_role(&self, identity: &str, role: Role) -> bool {
        self.roles.has_role(identity, role)
    }

    // --- Exam lifecycle operations ---

    /// Publishes a new exam. Requires the Examiner role.
    ///
    /// Assigns the next sequential id (first exam gets 1; ids are never
    /// reused). The new exam starts active with zero participants.
    pub fn create_exam(&mut self, caller: &str, params: ExamParams, now: u64) -> Result<u64> {
        self.require_role(caller, Role::Examiner)?;

        let exam_id = self.exams.create(caller, params);
        info!(exam_id, examiner = caller, "📝 exam created");

        self.sink.publish(PlatformEvent::ExamCreated {
            exam_id,
            examiner: caller.to_string(),
            timestamp: now,
        });
        Ok(exam_id)
    }

    /// Takes an exam out of circulation: no further registrations are
    /// accepted. Permitted to the owning examiner or an administrator.
    ///
    /// The record itself survives; submissions and validations already in
    /// flight for it proceed under the usual window rules.
    pub fn deactivate_exam(&mut self, caller: &str, exam_id: u64, now: u64) -> Result<()> {
        let exam = self.exams.get(exam_id)?;
        if exam.examiner != caller && !self.roles.has_role(caller, Role::Administrator) {
            return Err(ExamError::NotAuthorized(caller.to_string(), Role::Examiner));
        }

        self.exams.deactivate(exam_id)?;
        info!(exam_id, by = caller, "exam deactivated");

        self.sink.publish(PlatformEvent::ExamDeactivated {
            exam_id,
            timestamp: now,
        });
        Ok(())
    }

    /// Registers `caller` as a candidate for `exam_id`.
    ///
    /// Preconditions, checked in order, each its own failure mode: the exam
    /// exists and is active, `now` is at or before the registration deadline,
    /// the student is not already registered, and capacity remains.
    pub fn register(&mut self, caller: &str, exam_id: u64, now: u64) -> Result<()> {
        let exam = self.exams.get(exam_id)?;
        if !exam.is_active {
            return Err(ExamError::ExamInactive(exam_id));
        }
        if !exam.registration_open(now) {
            return Err(ExamError::RegistrationClosed(
                exam_id,
                exam.registration_deadline,
            ));
        }
        if self.registrations.is_registered(exam_id, caller) {
            return Err(ExamError::AlreadyRegistered {
                exam_id,
                student: caller.to_string(),
            });
        }
        if !exam.has_capacity() {
            return Err(ExamError::ExamFull(exam_id, exam.max_participants));
        }

        self.registrations.record(exam_id, caller, now)?;
        self.exams.increment_participants(exam_id)?;
        info!(exam_id, student = caller, "student registered");

        self.sink.publish(PlatformEvent::StudentRegistered {
            exam_id,
            student: caller.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    /// Records `caller`'s answer submission for `exam_id`.
    ///
    /// Preconditions, in order: the student is registered, has no prior
    /// submission, and `now` lies inside the exam window (both bounds
    /// inclusive).
    pub fn submit(
        &mut self,
        caller: &str,
        exam_id: u64,
        answer_hash: [u8; 32],
        now: u64,
    ) -> Result<()> {
        if !self.registrations.is_registered(exam_id, caller) {
            return Err(ExamError::NotRegistered {
                exam_id,
                student: caller.to_string(),
            });
        }
        if self.submissions.has_submitted(exam_id, caller) {
            return Err(ExamError::AlreadySubmitted {
                exam_id,
                student: caller.to_string(),
            });
        }
        // Registration implies the exam exists.
        let exam = self.exams.get(exam_id)?;
        if now < exam.start_time {
            return Err(ExamError::NotStarted(exam_id));
        }
        if now > exam.end_time() {
            return Err(ExamError::Ended(exam_id));
        }

        self.submissions.record(exam_id, caller, answer_hash, now)?;
        info!(
            exam_id,
            student = caller,
            answer_hash = %to_hex(&answer_hash),
            "submission received"
        );

        self.sink.publish(PlatformEvent::SubmissionReceived {
            exam_id,
            student: caller.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    /// Appends `caller`'s score for `student`'s submission and runs the
    /// finalization rule. Requires the Validator role.
    ///
    /// Validation only opens strictly after the exam window has elapsed.
    /// The append itself is unconditional: the same validator may score a
    /// submission more than once, and scores keep arriving after the quorum
    /// — each one re-runs the averaging rule and overwrites the final score.
    pub fn validate(
        &mut self,
        caller: &str,
        exam_id: u64,
        student: &str,
        score: u8,
        now: u64,
    ) -> Result<()> {
        self.require_role(caller, Role::Validator)?;

        let exam = self.exams.get(exam_id)?;
        if !exam.window_elapsed(now) {
            return Err(ExamError::TooEarly(exam_id));
        }
        if score > 100 {
            return Err(ExamError::InvalidScore(score));
        }
        let quorum = exam.minimum_validators;

        let submission = self.submissions.find_mut(exam_id, student)?;
        let outcome = consensus::apply_validation(submission, caller, score, now, quorum);

        if outcome.newly_finalized {
            info!(
                exam_id,
                student,
                final_score = outcome.final_score,
                validations = outcome.validations,
                "✅ submission finalized at quorum"
            );
        } else {
            info!(
                exam_id,
                student,
                validator = caller,
                score,
                validations = outcome.validations,
                "validation recorded"
            );
        }

        self.sink.publish(PlatformEvent::ValidationRecorded {
            exam_id,
            student: student.to_string(),
            validator: caller.to_string(),
            score,
            timestamp: now,
        });
        Ok(())
    }

    // --- Read surface ---

    /// Public read view of an exam.
    pub fn get_exam_details(&self, exam_id: u64) -> Result<ExamDetails> {
        Ok(self.exams.get(exam_id)?.details())
    }

    /// The finalized score, or `None` while the submission is missing or
    /// still awaiting its quorum.
    pub fn get_student_score(&self, exam_id: u64, student: &str) -> Option<u8> {
        self.submissions
            .find(exam_id, student)
            .ok()
            .and_then(|submission| submission.final_score)
    }

    pub fn is_registered(&self, exam_id: u64, student: &str) -> bool {
        self.registrations.is_registered(exam_id, student)
    }

    pub fn has_submitted(&self, exam_id: u64, student: &str) -> bool {
        self.submissions.has_submitted(exam_id, student)
    }

    pub fn find_submission(&self, exam_id: u64, student: &str) -> Result<&Submission> {
        self.submissions.find(exam_id, student)
    }

    /// Registration count for an exam, for audit against the derived
    /// `current_participants` counter.
    pub fn registration_count(&self, exam_id: u64) -> usize {
        self.registrations.count_for(exam_id)
    }

    fn require_role(&self, caller: &str, role: Role) -> Result<()> {
        if !self.roles.has_role(caller, role) {
            return Err(ExamError::NotAuthorized(caller.to_string(), role));
        }
        Ok(())
    }
}
