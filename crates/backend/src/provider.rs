use async_trait::async_trait;
use thiserror::Error;

use quiz_core::model::{
    AnswerReview, AttemptId, Category, CategoryId, OptionId, QuestionId, QuizQuestion,
    ScoreSummary, UserAnswer,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors surfaced by question sources.
///
/// Variants carry stringified causes rather than the underlying transport
/// errors so that callers can clone and retain the value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderError {
    /// The category does not exist at the source.
    #[error("category not found")]
    NotFound,

    #[error("question source returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("question request failed: {0}")]
    Request(String),

    #[error("malformed question payload: {0}")]
    Decode(String),
}

/// Errors surfaced by the scoring backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmissionError {
    /// No attempt id was issued when the session started, so there is
    /// nothing to submit against.
    #[error("no attempt id was issued for this session")]
    MissingAttempt,

    #[error("scoring backend returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("submission request failed: {0}")]
    Request(String),

    #[error("malformed scoring payload: {0}")]
    Decode(String),
}

//
// ─── SUBMISSION PAYLOAD ────────────────────────────────────────────────────────
//

/// One recorded answer as handed to the scoring backend.
///
/// Only recorded answers are submitted; questions the user never touched do
/// not appear in the payload at all. A recorded skip keeps its entry but
/// carries no selected option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub selected_option: Option<OptionId>,
    pub time_taken_secs: u32,
}

impl AnswerSubmission {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        selected_option: Option<OptionId>,
        time_taken_secs: u32,
    ) -> Self {
        Self {
            question_id,
            selected_option,
            time_taken_secs,
        }
    }

    #[must_use]
    pub fn from_answer(answer: &UserAnswer) -> Self {
        Self {
            question_id: answer.question_id(),
            selected_option: answer.selected_option(),
            time_taken_secs: answer.time_taken_secs(),
        }
    }
}

//
// ─── TRAITS ────────────────────────────────────────────────────────────────────
//

/// Source of quiz questions, keyed by category.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch the question list for a category, in presentation order.
    ///
    /// An existing category with zero questions yields an empty `Vec`, not
    /// an error; `ProviderError::NotFound` means the category itself is
    /// unknown. Callers treat both as "nothing to quiz on".
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the source cannot be reached or returns
    /// a payload that does not normalize into questions.
    async fn fetch_questions(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<QuizQuestion>, ProviderError>;

    /// List the categories this source can serve.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport or decode failures.
    async fn list_categories(&self) -> Result<Vec<Category>, ProviderError>;
}

/// Scoring backend for completed quiz attempts.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Open a scoring attempt for a category, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` when the backend rejects or cannot receive
    /// the request.
    async fn start_attempt(&self, category_id: CategoryId) -> Result<AttemptId, SubmissionError>;

    /// Submit recorded answers for grading.
    ///
    /// The returned summary is authoritative: the backend may grade with
    /// rules the client does not know about.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` on transport failures, rejection, or a
    /// response that does not decode.
    async fn submit_answers(
        &self,
        attempt_id: AttemptId,
        answers: &[AnswerSubmission],
    ) -> Result<ScoreSummary, SubmissionError>;

    /// Fetch per-question grading detail for a submitted attempt.
    ///
    /// Best-effort: callers are expected to reconstruct review data locally
    /// when this fails.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` on transport or decode failures.
    async fn review_attempt(
        &self,
        attempt_id: AttemptId,
    ) -> Result<Vec<AnswerReview>, SubmissionError>;
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
