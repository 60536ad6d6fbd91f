use chrono::{DateTime, Utc};
use std::fmt;

use backend::AnswerSubmission;
use quiz_core::model::{CategoryId, OptionId, QuestionId, QuizQuestion, UserAnswer};

use super::progress::QuizProgress;
use crate::error::QuizError;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of the quiz feature.
///
/// Transitions only move forward: a manager reports `NotStarted` while no
/// session exists, a freshly built session is `InProgress`, and `complete`
/// is the only way to reach `Completed`. Nothing moves back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    NotStarted,
    InProgress,
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one quiz attempt.
///
/// Steps through a fixed question list with bounded two-way navigation and
/// keeps at most one recorded answer per question; re-answering a question
/// replaces the earlier record.
pub struct QuizSession {
    category_id: CategoryId,
    category_name: String,
    questions: Vec<QuizQuestion>,
    answers: Vec<UserAnswer>,
    current: usize,
    status: QuizStatus,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session over the given questions, positioned on the first one.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyCategory` if no questions are provided.
    pub fn new(
        category_id: CategoryId,
        category_name: impl Into<String>,
        questions: Vec<QuizQuestion>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyCategory(category_id));
        }

        Ok(Self {
            category_id,
            category_name: category_name.into(),
            questions,
            answers: Vec::new(),
            current: 0,
            status: QuizStatus::InProgress,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Answers recorded so far, in the order they were first recorded.
    #[must_use]
    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based index of the question currently shown.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question currently shown. The position never leaves the question
    /// list, so there is always one.
    #[must_use]
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == QuizStatus::Completed
    }

    /// The recorded answer for a question, if any.
    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&UserAnswer> {
        self.answers.iter().find(|a| a.question_id() == question_id)
    }

    /// Number of recorded answers that picked an option.
    #[must_use]
    pub fn attempted_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_attempted()).count()
    }

    /// Number of questions explicitly skipped so far.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_skipped()).count()
    }

    /// Returns a snapshot of progress through the question list.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.question_count();
        QuizProgress {
            total,
            position: self.current + 1,
            answered: self.attempted_count(),
            skipped: self.skipped_count(),
            remaining: total.saturating_sub(self.answers.len()),
            is_complete: self.is_complete(),
        }
    }

    /// Move to the next question. Returns false when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous question. Returns false when already on the first.
    pub fn retreat(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Record the user's choice for a question, replacing any earlier record.
    ///
    /// `None` records an explicit skip. Correctness is graded against the
    /// question's answer key at record time; an option id the question does
    /// not carry grades as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` if the session is finished and
    /// `QuizError::UnknownQuestion` if the question is not part of it.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        selected_option: Option<OptionId>,
        time_taken_secs: u32,
    ) -> Result<&UserAnswer, QuizError> {
        if self.is_complete() {
            return Err(QuizError::AlreadyCompleted);
        }
        let Some(question) = self.questions.iter().find(|q| q.id() == question_id) else {
            return Err(QuizError::UnknownQuestion(question_id));
        };

        let answer = match selected_option {
            Some(option_id) => UserAnswer::answered(
                question_id,
                option_id,
                question.is_correct_choice(option_id),
                time_taken_secs,
            ),
            None => UserAnswer::skipped(question_id, time_taken_secs),
        };

        let slot = match self
            .answers
            .iter()
            .position(|a| a.question_id() == question_id)
        {
            Some(slot) => {
                self.answers[slot] = answer;
                slot
            }
            None => {
                self.answers.push(answer);
                self.answers.len() - 1
            }
        };
        Ok(&self.answers[slot])
    }

    /// Mark the session finished. Recording and completion are rejected
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` if called twice.
    pub fn complete(&mut self, completed_at: DateTime<Utc>) -> Result<(), QuizError> {
        if self.is_complete() {
            return Err(QuizError::AlreadyCompleted);
        }
        self.status = QuizStatus::Completed;
        self.completed_at = Some(completed_at);
        Ok(())
    }

    /// One answer per question in question order, padding questions the user
    /// never touched as zero-second skips.
    #[must_use]
    pub fn padded_answers(&self) -> Vec<UserAnswer> {
        self.questions
            .iter()
            .map(|question| {
                self.answer_for(question.id())
                    .cloned()
                    .unwrap_or_else(|| UserAnswer::skipped(question.id(), 0))
            })
            .collect()
    }

    /// Wire payload for scoring: recorded answers only. Questions the user
    /// never touched are not part of the payload.
    #[must_use]
    pub fn submission_payload(&self) -> Vec<AnswerSubmission> {
        self.answers
            .iter()
            .map(AnswerSubmission::from_answer)
            .collect()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("category_id", &self.category_id)
            .field("questions_len", &self.questions.len())
            .field("answers_len", &self.answers.len())
            .field("current", &self.current)
            .field("status", &self.status)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::AnswerOption;
    use quiz_core::time::fixed_now;

    fn build_question(id: u64) -> QuizQuestion {
        QuizQuestion::new(
            QuestionId::new(id),
            CategoryId::new(1),
            "General",
            format!("Question {id}?"),
            vec![
                AnswerOption::new(OptionId::new(id * 10 + 1), "Right", true),
                AnswerOption::new(OptionId::new(id * 10 + 2), "Wrong", false),
            ],
            30,
            10,
        )
        .unwrap()
    }

    fn build_session(question_ids: &[u64]) -> QuizSession {
        let questions = question_ids.iter().copied().map(build_question).collect();
        QuizSession::new(CategoryId::new(1), "General", questions, fixed_now()).unwrap()
    }

    fn right_option(question_id: u64) -> OptionId {
        OptionId::new(question_id * 10 + 1)
    }

    fn wrong_option(question_id: u64) -> OptionId {
        OptionId::new(question_id * 10 + 2)
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err =
            QuizSession::new(CategoryId::new(9), "Empty", Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::EmptyCategory(CategoryId::new(9)));
    }

    #[test]
    fn starts_on_first_question_in_progress() {
        let session = build_session(&[1, 2, 3]);

        assert_eq!(session.status(), QuizStatus::InProgress);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_question().id(), QuestionId::new(1));
        assert_eq!(session.question_count(), 3);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn navigation_is_bounded() {
        let mut session = build_session(&[1, 2]);

        assert!(!session.retreat());
        assert_eq!(session.current_index(), 0);

        assert!(session.advance());
        assert_eq!(session.current_index(), 1);

        assert!(!session.advance());
        assert_eq!(session.current_index(), 1);

        assert!(session.retreat());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn records_and_grades_answers() {
        let mut session = build_session(&[1, 2]);

        let first = session
            .record_answer(QuestionId::new(1), Some(right_option(1)), 5)
            .unwrap();
        assert!(first.is_correct());
        assert_eq!(first.time_taken_secs(), 5);

        let second = session
            .record_answer(QuestionId::new(2), Some(wrong_option(2)), 9)
            .unwrap();
        assert!(!second.is_correct());
        assert_eq!(session.attempted_count(), 2);
    }

    #[test]
    fn reanswering_replaces_the_earlier_record() {
        let mut session = build_session(&[1, 2]);

        session
            .record_answer(QuestionId::new(1), Some(wrong_option(1)), 4)
            .unwrap();
        session
            .record_answer(QuestionId::new(1), Some(right_option(1)), 11)
            .unwrap();

        assert_eq!(session.answers().len(), 1);
        let answer = session.answer_for(QuestionId::new(1)).unwrap();
        assert_eq!(answer.selected_option(), Some(right_option(1)));
        assert!(answer.is_correct());
        assert_eq!(answer.time_taken_secs(), 11);
    }

    #[test]
    fn skip_records_without_selection() {
        let mut session = build_session(&[1]);

        let answer = session.record_answer(QuestionId::new(1), None, 30).unwrap();
        assert!(answer.is_skipped());
        assert!(!answer.is_correct());
        assert_eq!(session.skipped_count(), 1);
        assert_eq!(session.attempted_count(), 0);
    }

    #[test]
    fn unknown_option_grades_as_incorrect() {
        let mut session = build_session(&[1]);

        let answer = session
            .record_answer(QuestionId::new(1), Some(OptionId::new(999)), 3)
            .unwrap();
        assert!(!answer.is_correct());
        assert!(answer.is_attempted());
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut session = build_session(&[1]);

        let err = session
            .record_answer(QuestionId::new(42), Some(OptionId::new(1)), 3)
            .unwrap_err();
        assert_eq!(err, QuizError::UnknownQuestion(QuestionId::new(42)));
    }

    #[test]
    fn completed_session_rejects_changes() {
        let mut session = build_session(&[1]);
        session.complete(fixed_now()).unwrap();

        assert_eq!(session.status(), QuizStatus::Completed);
        assert_eq!(session.completed_at(), Some(fixed_now()));

        let err = session
            .record_answer(QuestionId::new(1), Some(right_option(1)), 2)
            .unwrap_err();
        assert_eq!(err, QuizError::AlreadyCompleted);
        assert_eq!(session.complete(fixed_now()).unwrap_err(), QuizError::AlreadyCompleted);
    }

    #[test]
    fn retreating_preserves_recorded_answers() {
        let mut session = build_session(&[1, 2]);

        session
            .record_answer(QuestionId::new(1), Some(right_option(1)), 6)
            .unwrap();
        assert!(session.advance());
        assert!(session.retreat());

        let answer = session.answer_for(QuestionId::new(1)).unwrap();
        assert_eq!(answer.selected_option(), Some(right_option(1)));
        assert_eq!(session.current_question().id(), QuestionId::new(1));
    }

    #[test]
    fn padded_answers_cover_every_question_in_order() {
        let mut session = build_session(&[1, 2, 3]);

        // answer the middle question only, out of display order
        session
            .record_answer(QuestionId::new(2), Some(right_option(2)), 8)
            .unwrap();

        let padded = session.padded_answers();
        assert_eq!(padded.len(), 3);
        assert_eq!(padded[0].question_id(), QuestionId::new(1));
        assert!(padded[0].is_skipped());
        assert_eq!(padded[0].time_taken_secs(), 0);
        assert!(padded[1].is_correct());
        assert!(padded[2].is_skipped());
    }

    #[test]
    fn payload_excludes_untouched_questions() {
        let mut session = build_session(&[1, 2, 3]);

        session
            .record_answer(QuestionId::new(3), Some(right_option(3)), 7)
            .unwrap();
        session.record_answer(QuestionId::new(1), None, 30).unwrap();

        let payload = session.submission_payload();
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[0].question_id, QuestionId::new(3));
        assert_eq!(payload[1].question_id, QuestionId::new(1));
        assert_eq!(payload[1].selected_option, None);
    }

    #[test]
    fn progress_tracks_position_and_counts() {
        let mut session = build_session(&[1, 2, 3]);

        session
            .record_answer(QuestionId::new(1), Some(right_option(1)), 4)
            .unwrap();
        session.advance();
        session.record_answer(QuestionId::new(2), None, 30).unwrap();

        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.position, 2);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.skipped, 1);
        assert_eq!(progress.remaining, 1);
        assert!(!progress.is_complete);
    }
}
