mod progress;
mod service;
mod timer;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use service::{QuizSession, QuizStatus};
pub use timer::CountdownTimer;
pub use workflow::QuizManager;
