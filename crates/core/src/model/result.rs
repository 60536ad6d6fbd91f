use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::answer::UserAnswer;
use crate::model::ids::{CategoryId, OptionId, QuestionId};
use crate::model::question::QuizQuestion;
use crate::time::format_secs;

/// Percentage at or above which a locally scored quiz counts as passed.
///
/// The backend reports its own pass/fail verdict; this threshold only
/// applies when scoring falls back to the local computation.
pub const PASS_MARK_PERCENT: u32 = 60;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("cannot score a quiz with no questions")]
    NoQuestions,

    #[error("too many questions for a single quiz: {len}")]
    TooManyQuestions { len: usize },

    #[error("answer records do not line up with the question list")]
    AnswerMismatch,

    #[error("completed_at is before started_at")]
    InvalidTimeRange,
}

//
// ─── COLLABORATOR RETURN SHAPES ────────────────────────────────────────────────
//

/// Aggregate grading returned by the scoring backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub score: u32,
    pub passed: bool,
}

impl ScoreSummary {
    #[must_use]
    pub fn new(total_questions: u32, correct_answers: u32, score: u32, passed: bool) -> Self {
        Self {
            total_questions,
            correct_answers,
            score,
            passed,
        }
    }
}

/// Per-question grading detail from the backend's review endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerReview {
    pub question_id: QuestionId,
    pub selected_option: Option<OptionId>,
    pub is_correct: bool,
}

impl AnswerReview {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        selected_option: Option<OptionId>,
        is_correct: bool,
    ) -> Self {
        Self {
            question_id,
            selected_option,
            is_correct,
        }
    }
}

/// Which computation produced a result's grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// The backend graded the attempt.
    Server,
    /// The backend was unreachable or rejected the attempt; grading came
    /// from the locally held correctness flags.
    LocalFallback,
}

//
// ─── QUIZ RESULT ───────────────────────────────────────────────────────────────
//

/// Immutable outcome of one submitted quiz.
///
/// Built once at submission time and never mutated. Carries the full
/// question and answer lists (one answer per question, in question order,
/// untouched questions padded as zero-time skips) so a review screen needs
/// nothing beyond this snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    category_id: CategoryId,
    category_name: String,
    total_questions: u32,
    correct_answers: u32,
    wrong_answers: u32,
    skipped_questions: u32,
    attempted_questions: u32,
    total_score: u32,
    earned_score: u32,
    percentage: u32,
    passed: bool,
    time_taken_secs: u32,
    time_allotted_secs: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    source: ScoreSource,
    questions: Vec<QuizQuestion>,
    answers: Vec<UserAnswer>,
}

impl QuizResult {
    /// Builds a result by grading answers against the locally held
    /// correctness flags.
    ///
    /// `answers` must contain exactly one record per question, in question
    /// order; the session produces such a padded list.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::NoQuestions` for an empty question list,
    /// `ResultError::AnswerMismatch` if the answer records do not pair up
    /// one-to-one with the questions, and `ResultError::InvalidTimeRange`
    /// if `completed_at` is before `started_at`.
    pub fn from_answers(
        category_id: CategoryId,
        category_name: impl Into<String>,
        questions: Vec<QuizQuestion>,
        answers: Vec<UserAnswer>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        let tally = Tally::measure(&questions, &answers, started_at, completed_at)?;

        let mut correct = 0_u32;
        let mut earned = 0_u32;
        for (question, answer) in questions.iter().zip(&answers) {
            if answer.is_correct() {
                correct = correct.saturating_add(1);
                earned = earned.saturating_add(question.points());
            }
        }

        let percentage = percentage_of(earned, tally.total_score);
        let passed = percentage >= PASS_MARK_PERCENT;

        Ok(Self::assemble(
            category_id,
            category_name.into(),
            questions,
            answers,
            tally,
            correct,
            earned,
            percentage,
            passed,
            ScoreSource::LocalFallback,
            started_at,
            completed_at,
        ))
    }

    /// Builds a result around the backend's authoritative grading.
    ///
    /// Correct count, earned score, and the pass verdict come from the
    /// summary; attempted/skipped counts and timing still derive from the
    /// locally held records, which also populate the review lists.
    ///
    /// # Errors
    ///
    /// Same conditions as [`QuizResult::from_answers`].
    pub fn from_summary(
        category_id: CategoryId,
        category_name: impl Into<String>,
        questions: Vec<QuizQuestion>,
        answers: Vec<UserAnswer>,
        summary: ScoreSummary,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        let tally = Tally::measure(&questions, &answers, started_at, completed_at)?;

        let percentage = percentage_of(summary.score, tally.total_score);

        Ok(Self::assemble(
            category_id,
            category_name.into(),
            questions,
            answers,
            tally,
            summary.correct_answers,
            summary.score,
            percentage,
            summary.passed,
            ScoreSource::Server,
            started_at,
            completed_at,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        category_id: CategoryId,
        category_name: String,
        questions: Vec<QuizQuestion>,
        answers: Vec<UserAnswer>,
        tally: Tally,
        correct_answers: u32,
        earned_score: u32,
        percentage: u32,
        passed: bool,
        source: ScoreSource,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category_id,
            category_name,
            total_questions: tally.total_questions,
            correct_answers,
            wrong_answers: tally.attempted.saturating_sub(correct_answers),
            skipped_questions: tally.skipped,
            attempted_questions: tally.attempted,
            total_score: tally.total_score,
            earned_score,
            percentage,
            passed,
            time_taken_secs: tally.time_taken_secs,
            time_allotted_secs: tally.time_allotted_secs,
            started_at,
            completed_at,
            source,
            questions,
            answers,
        }
    }

    // Accessors
    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn wrong_answers(&self) -> u32 {
        self.wrong_answers
    }

    #[must_use]
    pub fn skipped_questions(&self) -> u32 {
        self.skipped_questions
    }

    #[must_use]
    pub fn attempted_questions(&self) -> u32 {
        self.attempted_questions
    }

    /// Maximum points obtainable across all questions.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn earned_score(&self) -> u32 {
        self.earned_score
    }

    /// Earned score over total score, rounded half-up to a whole percent
    /// and clamped to 0-100. Zero when no points were obtainable.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Seconds spent across all recorded answers.
    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.time_taken_secs
    }

    /// Sum of every question's time limit.
    #[must_use]
    pub fn time_allotted_secs(&self) -> u32 {
        self.time_allotted_secs
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_allotted_secs.saturating_sub(self.time_taken_secs)
    }

    /// Time spent, formatted for display ("2m 5s").
    #[must_use]
    pub fn time_taken_label(&self) -> String {
        format_secs(self.time_taken_secs)
    }

    /// Unused time, formatted for display.
    #[must_use]
    pub fn time_remaining_label(&self) -> String {
        format_secs(self.time_remaining_secs())
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn source(&self) -> ScoreSource {
        self.source
    }

    /// Questions in presentation order.
    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// One answer per question, aligned with [`QuizResult::questions`].
    #[must_use]
    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }
}

/// Figures derivable from the question/answer lists alone, shared by both
/// builders.
struct Tally {
    total_questions: u32,
    attempted: u32,
    skipped: u32,
    total_score: u32,
    time_taken_secs: u32,
    time_allotted_secs: u32,
}

impl Tally {
    fn measure(
        questions: &[QuizQuestion],
        answers: &[UserAnswer],
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if questions.is_empty() {
            return Err(ResultError::NoQuestions);
        }
        if completed_at < started_at {
            return Err(ResultError::InvalidTimeRange);
        }
        let total_questions = u32::try_from(questions.len()).map_err(|_| {
            ResultError::TooManyQuestions {
                len: questions.len(),
            }
        })?;
        if answers.len() != questions.len() {
            return Err(ResultError::AnswerMismatch);
        }

        let mut attempted = 0_u32;
        let mut skipped = 0_u32;
        let mut total_score = 0_u32;
        let mut time_taken_secs = 0_u32;
        let mut time_allotted_secs = 0_u32;

        for (question, answer) in questions.iter().zip(answers) {
            if answer.question_id() != question.id() {
                return Err(ResultError::AnswerMismatch);
            }
            if answer.is_attempted() {
                attempted = attempted.saturating_add(1);
            } else {
                skipped = skipped.saturating_add(1);
            }
            total_score = total_score.saturating_add(question.points());
            time_taken_secs = time_taken_secs.saturating_add(answer.time_taken_secs());
            time_allotted_secs = time_allotted_secs.saturating_add(question.time_limit_secs());
        }

        Ok(Self {
            total_questions,
            attempted,
            skipped,
            total_score,
            time_taken_secs,
            time_allotted_secs,
        })
    }
}

/// Rounded share of `earned` in `total`, as a whole percent.
///
/// Half-up rounding in integer arithmetic: `(200e + t) / 2t`. Returns 0
/// when `total` is 0 and clamps pathological inputs to 100.
fn percentage_of(earned: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = 200 * u64::from(earned) + u64::from(total);
    let pct = scaled / (2 * u64::from(total));
    u32::try_from(pct.min(100)).unwrap_or(100)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
