use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

/// Typed lifecycle notification, emitted once per successful mutating
/// operation. Failed operations emit nothing. Delivery and ordering
/// guarantees past the sink boundary belong to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    ExamCreated {
        exam_id: u64,
        examiner: String,
        timestamp: u64,
    },
    ExamDeactivated {
        exam_id: u64,
        timestamp: u64,
    },
    StudentRegistered {
        exam_id: u64,
        student: String,
        timestamp: u64,
    },
    SubmissionReceived {
        exam_id: u64,
        student: String,
        timestamp: u64,
    },
    ValidationRecorded {
        exam_id: u64,
        student: String,
        validator: String,
        score: u8,
        timestamp: u64,
    },
}

/// Downstream receiver of lifecycle notifications.
///
/// Implementations must not block: `publish` is called from inside an
/// operation that has already committed, so a slow or failed sink can only
/// drop the notification, never the state change.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: PlatformEvent);
}

/// Sink that writes events to the tracing log.
#[derive(Debug, Default, Clone)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: PlatformEvent) {
        tracing::info!(target: "proctor::events", ?event, "event published");
    }
}

/// Sink backed by an unbounded channel, for async consumers.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<PlatformEvent>,
}

impl ChannelSink {
    /// Creates the sink plus the receiving half for the consumer.
    pub fn new() -> (Self, UnboundedReceiver<PlatformEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: PlatformEvent) {
        if self.tx.send(event).is_err() {
            warn!("⚠️ Event receiver dropped; notification discarded");
        }
    }
}
