//! Validator-score aggregation and quorum finalization.
//!
//! Each submission moves through a two-state machine:
//! `AwaitingValidation` while fewer than `minimum_validators` scores exist,
//! `Finalized` from the moment the quorum bar is crossed. The transition is
//! one-way, but the final score is deliberately *not* frozen: every
//! validation appended after the quorum re-runs the averaging rule and
//! overwrites the stored score. Duplicate validator identities are accepted
//! and count toward the quorum.

use crate::submission::{Submission, SubmissionStatus, Validation};

/// Result of applying one validator score to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Total validations recorded after the append.
    pub validations: usize,
    /// The (re)computed final score, present iff quorum is met.
    pub final_score: Option<u8>,
    /// True exactly once: on the validation that first crosses the quorum.
    pub newly_finalized: bool,
}

/// Appends `score` from `validator` and evaluates the finalization rule.
///
/// The append is unconditional; eligibility (role, timing, score range) has
/// already been checked by the caller. When `validations.len()` reaches
/// `minimum_validators`, the final score is `floor(sum / len)` using integer
/// division, and it is recomputed on every subsequent validation.
pub fn apply_validation(
    submission: &mut Submission,
    validator: &str,
    score: u8,
    now: u64,
    minimum_validators: u32,
) -> ValidationOutcome {
    submission.validations.push(Validation {
        validator: validator.to_string(),
        score,
        validated_at: now,
    });

    let count = submission.validations.len();
    if (count as u32) < minimum_validators {
        return ValidationOutcome {
            validations: count,
            final_score: None,
            newly_finalized: false,
        };
    }

    let sum: u32 = submission.validations.iter().map(|v| v.score as u32).sum();
    let average = (sum / count as u32) as u8;

    let newly_finalized = submission.status == SubmissionStatus::AwaitingValidation;
    submission.final_score = Some(average);
    submission.status = SubmissionStatus::Finalized;

    ValidationOutcome {
        validations: count,
        final_score: Some(average),
        newly_finalized,
    }
}
