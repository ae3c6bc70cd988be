use thiserror::Error;

use proctor_common::auth::errors::AuthError;
use proctor_common::auth::roles::Role;

pub type Result<T> = std::result::Result<T, ExamError>;

/// Defines the failure modes of the exam lifecycle engine.
///
/// Every rejected operation surfaces exactly one of these reasons and leaves
/// no partial state change behind. The engine never retries on its own; a
/// rejected transaction must be resubmitted by the caller once the violated
/// condition no longer holds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExamError {
    /// The caller lacks the role required for the operation.
    #[error("Caller '{0}' does not hold the {1} role.")]
    NotAuthorized(String, Role),

    /// No exam exists with the given identifier.
    #[error("Exam {0} does not exist.")]
    ExamNotFound(u64),

    /// The exam exists but has been deactivated.
    #[error("Exam {0} is not active.")]
    ExamInactive(u64),

    /// The registration deadline has passed.
    #[error("Registration for exam {0} closed at {1}.")]
    RegistrationClosed(u64, u64),

    /// The student already holds a registration for this exam.
    #[error("Student '{student}' is already registered for exam {exam_id}.")]
    AlreadyRegistered { exam_id: u64, student: String },

    /// The exam has reached its participant cap.
    #[error("Exam {0} is full ({1} participants).")]
    ExamFull(u64, u32),

    /// The student holds no registration for this exam.
    #[error("Student '{student}' is not registered for exam {exam_id}.")]
    NotRegistered { exam_id: u64, student: String },

    /// The student already submitted answers for this exam.
    #[error("Student '{student}' already submitted for exam {exam_id}.")]
    AlreadySubmitted { exam_id: u64, student: String },

    /// The exam window has not opened yet.
    #[error("Exam {0} has not started yet.")]
    NotStarted(u64),

    /// The exam window has already closed.
    #[error("Exam {0} has already ended.")]
    Ended(u64),

    /// Validation is only permitted once the exam window has fully elapsed.
    #[error("Exam {0} is still in its active window; validation is not open yet.")]
    TooEarly(u64),

    /// Scores must lie in 0..=100.
    #[error("Score {0} is outside the allowed range 0..=100.")]
    InvalidScore(u8),

    /// No submission exists for the given (exam, student) pair.
    #[error("No submission from '{student}' for exam {exam_id}.")]
    SubmissionNotFound { exam_id: u64, student: String },

    /// Role administration failure surfaced from the authorization registry.
    #[error(transparent)]
    Auth(#[from] AuthError),
}
