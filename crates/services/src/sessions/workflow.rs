use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use backend::{
    AnswerSubmission, ProviderError, QuestionProvider, SubmissionError, SubmissionService,
};
use quiz_core::model::{
    AnswerReview, AttemptId, CategoryId, OptionId, QuestionId, QuizQuestion, QuizResult,
    UserAnswer,
};

use super::progress::QuizProgress;
use super::service::{QuizSession, QuizStatus};
use crate::Clock;
use crate::error::QuizError;

//
// ─── MANAGER ───────────────────────────────────────────────────────────────────
//

/// Owns the active quiz attempt and drives the submission workflow.
///
/// UI layers hold the manager, not the session: every read and write of
/// quiz state goes through it, and `start` is the only way a session comes
/// into existence.
pub struct QuizManager {
    clock: Clock,
    provider: Arc<dyn QuestionProvider>,
    submissions: Arc<dyn SubmissionService>,
    session: Option<QuizSession>,
    attempt_id: Option<AttemptId>,
    submitting: bool,
    last_error: Option<QuizError>,
}

impl QuizManager {
    #[must_use]
    pub fn new(
        clock: Clock,
        provider: Arc<dyn QuestionProvider>,
        submissions: Arc<dyn SubmissionService>,
    ) -> Self {
        Self {
            clock,
            provider,
            submissions,
            session: None,
            attempt_id: None,
            submitting: false,
            last_error: None,
        }
    }

    /// Fetch questions for a category and start a fresh session on them.
    ///
    /// Replaces any prior session and clears remembered errors. A scoring
    /// attempt is opened with the submission service on a best-effort
    /// basis; when that fails the quiz still starts and scoring falls back
    /// to the local path at submit time.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyCategory` when the category has no
    /// questions and `QuizError::Provider` for other fetch failures. The
    /// prior session, if any, is kept on failure.
    pub async fn start(
        &mut self,
        category_id: CategoryId,
        category_name: impl Into<String>,
    ) -> Result<(), QuizError> {
        self.last_error = None;

        let questions = match self.provider.fetch_questions(category_id).await {
            Ok(questions) => questions,
            Err(ProviderError::NotFound) => {
                return Err(self.remember(QuizError::EmptyCategory(category_id)));
            }
            Err(e) => return Err(self.remember(QuizError::Provider(e))),
        };

        let category_name = category_name.into();
        let session = match QuizSession::new(
            category_id,
            category_name.clone(),
            questions,
            self.clock.now(),
        ) {
            Ok(session) => session,
            Err(e) => return Err(self.remember(e)),
        };

        let attempt_id = match self.submissions.start_attempt(category_id).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Could not open a scoring attempt: {e}; will score locally");
                None
            }
        };

        tracing::info!(
            "Started quiz for '{}' with {} questions",
            category_name,
            session.question_count()
        );
        self.session = Some(session);
        self.attempt_id = attempt_id;
        self.submitting = false;
        Ok(())
    }

    /// Lifecycle status, `NotStarted` until a session exists.
    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.session
            .as_ref()
            .map_or(QuizStatus::NotStarted, |session| session.status())
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// The question currently shown, if a session is active.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        Some(self.session.as_ref()?.current_question())
    }

    /// The recorded answer for a question in the active session, if any.
    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&UserAnswer> {
        self.session.as_ref()?.answer_for(question_id)
    }

    #[must_use]
    pub fn progress(&self) -> Option<QuizProgress> {
        Some(self.session.as_ref()?.progress())
    }

    /// The most recent error, kept for the UI until the next start or reset.
    #[must_use]
    pub fn last_error(&self) -> Option<&QuizError> {
        self.last_error.as_ref()
    }

    /// Record the user's choice for a question in the active session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveSession` without a session, otherwise
    /// whatever [`QuizSession::record_answer`] rejects.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        selected_option: Option<OptionId>,
        time_taken_secs: u32,
    ) -> Result<(), QuizError> {
        let outcome = match self.session.as_mut() {
            Some(session) => session
                .record_answer(question_id, selected_option, time_taken_secs)
                .map(|_| ()),
            None => Err(QuizError::NoActiveSession),
        };
        match outcome {
            Ok(()) => {
                tracing::debug!("Recorded answer for question {question_id}");
                Ok(())
            }
            Err(e) => Err(self.remember(e)),
        }
    }

    /// Handle a countdown expiry for `question_id`.
    ///
    /// A timeout records the question as skipped with the full time limit
    /// spent, then moves on to the next question. Late wakeups are ignored:
    /// nothing happens unless `question_id` is the question currently
    /// showing in an unfinished session. Returns whether the timeout was
    /// applied.
    pub fn record_timeout(&mut self, question_id: QuestionId) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.is_complete() || session.current_question().id() != question_id {
            return false;
        }

        let limit = session.current_question().time_limit_secs();
        if session.record_answer(question_id, None, limit).is_err() {
            return false;
        }
        session.advance();
        tracing::debug!("Question {question_id} timed out, recorded as a skip");
        true
    }

    /// Move to the next question. False at the end or without a session.
    pub fn advance(&mut self) -> bool {
        self.session.as_mut().is_some_and(|session| session.advance())
    }

    /// Move to the previous question. False at the start or without a
    /// session.
    pub fn retreat(&mut self) -> bool {
        self.session.as_mut().is_some_and(|session| session.retreat())
    }

    /// Submit the session for scoring and produce the final result.
    ///
    /// The payload carries the recorded answers; the result pads questions
    /// the user never touched as zero-second skips. Scoring goes to the
    /// submission service first and the server's summary is authoritative.
    /// Any submission failure falls back to grading locally against the
    /// answer key, and a failed review fetch never fails the submit.
    ///
    /// On success the session is completed in place; it stays around for
    /// the review screen until `reset` or the next `start`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveSession` without a session,
    /// `QuizError::AlreadyCompleted` after a successful submit, and
    /// `QuizError::SubmissionInProgress` while an earlier submit is still
    /// pending (a submit future dropped mid-flight leaves that guard
    /// engaged until `reset`). `QuizError::Submission` surfaces only when
    /// the local fallback cannot score the session either.
    pub async fn submit(&mut self) -> Result<QuizResult, QuizError> {
        {
            let Some(session) = self.session.as_ref() else {
                return Err(self.remember(QuizError::NoActiveSession));
            };
            if session.is_complete() {
                return Err(self.remember(QuizError::AlreadyCompleted));
            }
        }
        if self.submitting {
            return Err(self.remember(QuizError::SubmissionInProgress));
        }

        self.submitting = true;
        let outcome = self.run_submission().await;
        self.submitting = false;

        outcome.map_err(|e| self.remember(e))
    }

    async fn run_submission(&mut self) -> Result<QuizResult, QuizError> {
        let Some(session) = self.session.as_ref() else {
            return Err(QuizError::NoActiveSession);
        };

        let payload = session.submission_payload();
        let category_id = session.category_id();
        let category_name = session.category_name().to_owned();
        let questions = session.questions().to_vec();
        let padded = session.padded_answers();
        let started_at = session.started_at();
        let now = self.clock.now();

        let result = match self
            .score_remotely(
                category_id,
                &category_name,
                &questions,
                &padded,
                &payload,
                started_at,
                now,
            )
            .await
        {
            Ok(result) => result,
            Err(submit_err) => {
                tracing::warn!("Remote scoring failed ({submit_err}); scoring locally");
                match QuizResult::from_answers(
                    category_id,
                    category_name,
                    questions,
                    padded,
                    started_at,
                    now,
                ) {
                    Ok(result) => result,
                    Err(tally_err) => {
                        tracing::error!("Local scoring failed as well: {tally_err}");
                        return Err(QuizError::Submission(submit_err));
                    }
                }
            }
        };

        if let Some(session) = self.session.as_mut() {
            session.complete(now)?;
        }
        Ok(result)
    }

    async fn score_remotely(
        &self,
        category_id: CategoryId,
        category_name: &str,
        questions: &[QuizQuestion],
        padded: &[UserAnswer],
        payload: &[AnswerSubmission],
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<QuizResult, SubmissionError> {
        let attempt_id = self.attempt_id.ok_or(SubmissionError::MissingAttempt)?;
        let summary = self.submissions.submit_answers(attempt_id, payload).await?;

        let answers = match self.submissions.review_attempt(attempt_id).await {
            Ok(reviews) => merge_reviews(padded, &reviews),
            Err(e) => {
                tracing::warn!("Answer review unavailable ({e}); using local records");
                padded.to_vec()
            }
        };

        QuizResult::from_summary(
            category_id,
            category_name,
            questions.to_vec(),
            answers,
            summary,
            started_at,
            completed_at,
        )
        .map_err(|e| SubmissionError::Decode(e.to_string()))
    }

    /// Drop the active session and all remembered state.
    pub fn reset(&mut self) {
        if self.session.is_some() {
            tracing::info!("Quiz session reset");
        }
        self.session = None;
        self.attempt_id = None;
        self.submitting = false;
        self.last_error = None;
    }

    fn remember(&mut self, error: QuizError) -> QuizError {
        self.last_error = Some(error.clone());
        error
    }
}

impl fmt::Debug for QuizManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizManager")
            .field("session", &self.session)
            .field("attempt_id", &self.attempt_id)
            .field("submitting", &self.submitting)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

/// Overlay server review verdicts on the locally recorded answers.
///
/// The server echoes the selection it graded, so its verdict wins where it
/// reports a question; only the local timing is kept. Questions the review
/// does not mention keep the local record untouched.
fn merge_reviews(padded: &[UserAnswer], reviews: &[AnswerReview]) -> Vec<UserAnswer> {
    padded
        .iter()
        .map(|local| {
            let review = reviews
                .iter()
                .find(|review| review.question_id == local.question_id());
            match review {
                Some(review) => match review.selected_option {
                    Some(option_id) => UserAnswer::answered(
                        local.question_id(),
                        option_id,
                        review.is_correct,
                        local.time_taken_secs(),
                    ),
                    None => UserAnswer::skipped(local.question_id(), local.time_taken_secs()),
                },
                None => local.clone(),
            }
        })
        .collect()
}
