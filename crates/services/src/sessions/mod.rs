mod plan;
mod progress;
mod question;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{DISTRACTOR_COUNT, POOL_OVERFETCH, PracticeSelector, RECENT_WINDOW};
pub use progress::SessionProgress;
pub use question::{Question, QuestionKind};
pub use service::{ActiveSession, QuestionStage};
pub use workflow::{Advance, AnswerOutcome, PracticeLoopService};
