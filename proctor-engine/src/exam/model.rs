use serde::{Deserialize, Serialize};

/// A published exam and its lifecycle parameters.
///
/// Created once by an examiner and never deleted. `current_participants` is
/// a derived counter mutated only by successful registrations. The engine
/// enforces the registration deadline and the submission window
/// independently; callers are responsible for how the two relate
/// (`registration_deadline` may lie before, at, or after `start_time`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    /// Unique, monotonically assigned identifier. Never reused.
    pub exam_id: u64,
    pub title: String,
    /// Opaque digest of the exam content; the content itself is never stored.
    #[serde(with = "hex")]
    pub content_hash: [u8; 32],
    /// Opening of the submission window (UNIX seconds).
    pub start_time: u64,
    /// Length of the submission window, in seconds.
    pub duration: u64,
    /// Last instant at which registration is accepted (inclusive).
    pub registration_deadline: u64,
    pub max_participants: u32,
    pub current_participants: u32,
    /// Quorum: validations required before a final score is computed.
    pub minimum_validators: u32,
    /// Identity of the owning examiner.
    pub examiner: String,
    pub is_active: bool,
    /// Informational pass threshold; not enforced by the engine.
    pub passing_score: u8,
}

impl Exam {
    /// Last instant of the submission window (inclusive).
    pub fn end_time(&self) -> u64 {
        self.start_time + self.duration
    }

    /// True while registration is still accepted. The deadline itself is in.
    pub fn registration_open(&self, now: u64) -> bool {
        now <= self.registration_deadline
    }

    /// True while submissions are accepted. Both window bounds are inclusive.
    pub fn window_contains(&self, now: u64) -> bool {
        now >= self.start_time && now <= self.end_time()
    }

    /// True once the active window has fully elapsed and validation opens.
    pub fn window_elapsed(&self, now: u64) -> bool {
        now > self.end_time()
    }

    pub fn has_capacity(&self) -> bool {
        self.current_participants < self.max_participants
    }

    pub fn details(&self) -> ExamDetails {
        ExamDetails {
            title: self.title.clone(),
            start_time: self.start_time,
            duration: self.duration,
            current_participants: self.current_participants,
            is_active: self.is_active,
        }
    }
}

/// Caller-supplied parameters for publishing a new exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamParams {
    pub title: String,
    #[serde(with = "hex")]
    pub content_hash: [u8; 32],
    pub start_time: u64,
    pub duration: u64,
    pub registration_deadline: u64,
    pub max_participants: u32,
    pub minimum_validators: u32,
    pub passing_score: u8,
}

/// Public read view of an exam, as returned by `get_exam_details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDetails {
    pub title: String,
    pub start_time: u64,
    pub duration: u64,
    pub current_participants: u32,
    pub is_active: bool,
}
