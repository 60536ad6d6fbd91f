#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::QuizError;

pub use sessions::{CountdownTimer, QuizManager, QuizProgress, QuizSession, QuizStatus};
