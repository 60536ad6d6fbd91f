//! Shared error types for the services crate.

use thiserror::Error;

use backend::{ProviderError, SubmissionError};
use quiz_core::model::{CategoryId, QuestionId};

/// Errors emitted by the quiz session manager.
///
/// The manager keeps the most recent error around for the UI to render,
/// so variants are cheap to clone and comparable in tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("category {0} has no questions")]
    EmptyCategory(CategoryId),
    #[error("no active quiz session")]
    NoActiveSession,
    #[error("quiz session already completed")]
    AlreadyCompleted,
    #[error("a submission is already in progress")]
    SubmissionInProgress,
    #[error("question {0} is not part of the active session")]
    UnknownQuestion(QuestionId),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
