pub mod consensus;
pub mod error;
pub mod events;
pub mod exam;
pub mod platform;
pub mod registration;
pub mod submission;

pub use error::{ExamError, Result};
pub use platform::Platform;
