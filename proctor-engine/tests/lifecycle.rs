use proctor_common::auth::roles::Role;
use proctor_common::crypto::fingerprint::fingerprint;
use proctor_engine::events::{ChannelSink, PlatformEvent};
use proctor_engine::exam::model::ExamParams;
use proctor_engine::{ExamError, Platform};
use tokio::sync::mpsc::UnboundedReceiver;

const START: u64 = 1_000;
const DURATION: u64 = 600;
const DEADLINE: u64 = 900;

fn params(max_participants: u32, minimum_validators: u32) -> ExamParams {
    ExamParams {
        title: "Distributed Systems Final".to_string(),
        content_hash: fingerprint(b"exam content v1"),
        start_time: START,
        duration: DURATION,
        registration_deadline: DEADLINE,
        max_participants,
        minimum_validators,
        passing_score: 60,
    }
}

/// Platform with one examiner ("prof") and one published exam (id 1).
fn setup(
    max_participants: u32,
    minimum_validators: u32,
) -> (Platform, UnboundedReceiver<PlatformEvent>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let (sink, rx) = ChannelSink::new();
    let mut platform = Platform::new("root", Box::new(sink));
    platform.grant_role("root", "prof", Role::Examiner).unwrap();
    platform
        .create_exam("prof", params(max_participants, minimum_validators), 100)
        .unwrap();
    (platform, rx)
}

#[test]
fn exam_ids_are_sequential_from_one() {
    let (mut platform, _rx) = setup(10, 3);
    let second = platform.create_exam("prof", params(10, 3), 110).unwrap();
    let third = platform.create_exam("prof", params(10, 3), 120).unwrap();
    assert_eq!(second, 2);
    assert_eq!(third, 3);
}

#[test]
fn registration_window_boundaries() {
    let (mut platform, _rx) = setup(10, 3);

    // Exactly at the deadline succeeds.
    platform.register("alice", 1, DEADLINE).unwrap();
    assert!(platform.is_registered(1, "alice"));

    // Strictly after the deadline fails.
    let err = platform.register("bob", 1, DEADLINE + 1).unwrap_err();
    assert_eq!(err, ExamError::RegistrationClosed(1, DEADLINE));
    assert!(!platform.is_registered(1, "bob"));
}

#[test]
fn registration_rejects_duplicates_and_enforces_capacity() {
    let (mut platform, _rx) = setup(2, 3);

    platform.register("alice", 1, 200).unwrap();
    let err = platform.register("alice", 1, 250).unwrap_err();
    assert_eq!(
        err,
        ExamError::AlreadyRegistered {
            exam_id: 1,
            student: "alice".to_string()
        }
    );

    platform.register("bob", 1, 300).unwrap();
    let err = platform.register("carol", 1, 400).unwrap_err();
    assert_eq!(err, ExamError::ExamFull(1, 2));

    // The rejected attempts left no trace.
    assert_eq!(platform.registration_count(1), 2);
    assert_eq!(
        platform.get_exam_details(1).unwrap().current_participants,
        2
    );
}

#[test]
fn participant_counter_matches_registrations() {
    let (mut platform, _rx) = setup(50, 3);
    for i in 0..10u64 {
        platform.register(&format!("student-{i}"), 1, 200 + i).unwrap();
    }
    // A second exam keeps its own counter.
    platform.create_exam("prof", params(50, 3), 110).unwrap();
    platform.register("alice", 2, 300).unwrap();

    assert_eq!(platform.registration_count(1), 10);
    assert_eq!(
        platform.get_exam_details(1).unwrap().current_participants as usize,
        platform.registration_count(1)
    );
    assert_eq!(platform.registration_count(2), 1);
}

#[test]
fn deactivated_exam_rejects_registration() {
    let (mut platform, _rx) = setup(10, 3);

    // Only the owner or an administrator may deactivate.
    let err = platform.deactivate_exam("mallory", 1, 300).unwrap_err();
    assert_eq!(
        err,
        ExamError::NotAuthorized("mallory".to_string(), Role::Examiner)
    );

    platform.deactivate_exam("prof", 1, 300).unwrap();
    assert!(!platform.get_exam_details(1).unwrap().is_active);

    // Inactive beats every later check, including the deadline.
    let err = platform.register("alice", 1, 200).unwrap_err();
    assert_eq!(err, ExamError::ExamInactive(1));
}

#[test]
fn register_against_unknown_exam_fails() {
    let (mut platform, _rx) = setup(10, 3);
    assert_eq!(
        platform.register("alice", 42, 200).unwrap_err(),
        ExamError::ExamNotFound(42)
    );
}

#[test]
fn submission_window_boundaries() {
    let (mut platform, _rx) = setup(10, 3);
    for student in ["alice", "bob", "carol", "dave"] {
        platform.register(student, 1, 200).unwrap();
    }
    let answers = fingerprint(b"answers");

    // Before the window opens.
    let err = platform.submit("alice", 1, answers, START - 1).unwrap_err();
    assert_eq!(err, ExamError::NotStarted(1));

    // Exactly at start succeeds.
    platform.submit("alice", 1, answers, START).unwrap();

    // Exactly at the end succeeds.
    platform.submit("bob", 1, answers, START + DURATION).unwrap();

    // Strictly after the end fails.
    let err = platform
        .submit("carol", 1, answers, START + DURATION + 1)
        .unwrap_err();
    assert_eq!(err, ExamError::Ended(1));
    assert!(!platform.has_submitted(1, "carol"));
}

#[test]
fn submit_requires_registration_and_is_unique() {
    let (mut platform, _rx) = setup(10, 3);
    platform.register("alice", 1, 200).unwrap();
    let answers = fingerprint(b"answers");

    let err = platform.submit("mallory", 1, answers, 1_100).unwrap_err();
    assert_eq!(
        err,
        ExamError::NotRegistered {
            exam_id: 1,
            student: "mallory".to_string()
        }
    );

    platform.submit("alice", 1, answers, 1_100).unwrap();
    let err = platform
        .submit("alice", 1, fingerprint(b"revised"), 1_200)
        .unwrap_err();
    assert_eq!(
        err,
        ExamError::AlreadySubmitted {
            exam_id: 1,
            student: "alice".to_string()
        }
    );

    // The original submission is untouched.
    let submission = platform.find_submission(1, "alice").unwrap();
    assert_eq!(submission.answer_hash, answers);
    assert_eq!(submission.submitted_at, 1_100);
}

#[test]
fn every_successful_mutation_emits_one_event() {
    let (mut platform, mut rx) = setup(10, 1);
    platform.grant_role("root", "vera", Role::Validator).unwrap();
    platform.register("alice", 1, 200).unwrap();
    platform
        .submit("alice", 1, fingerprint(b"answers"), 1_100)
        .unwrap();
    platform.validate("vera", 1, "alice", 90, 1_700).unwrap();

    let events: Vec<PlatformEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0],
        PlatformEvent::ExamCreated {
            exam_id: 1,
            examiner: "prof".to_string(),
            timestamp: 100,
        }
    );
    assert_eq!(
        events[1],
        PlatformEvent::StudentRegistered {
            exam_id: 1,
            student: "alice".to_string(),
            timestamp: 200,
        }
    );
    assert_eq!(
        events[2],
        PlatformEvent::SubmissionReceived {
            exam_id: 1,
            student: "alice".to_string(),
            timestamp: 1_100,
        }
    );
    assert_eq!(
        events[3],
        PlatformEvent::ValidationRecorded {
            exam_id: 1,
            student: "alice".to_string(),
            validator: "vera".to_string(),
            score: 90,
            timestamp: 1_700,
        }
    );
}

#[test]
fn role_revocation_closes_the_gate() {
    let (mut platform, _rx) = setup(10, 3);
    platform.grant_role("root", "vera", Role::Validator).unwrap();
    platform.revoke_role("root", "vera", Role::Validator).unwrap();

    let err = platform.validate("vera", 1, "alice", 80, 2_000).unwrap_err();
    assert_eq!(
        err,
        ExamError::NotAuthorized("vera".to_string(), Role::Validator)
    );
}
