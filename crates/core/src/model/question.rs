use thiserror::Error;

use crate::model::ids::{CategoryId, OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised when constructing a question from untrusted input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("option text cannot be empty")]
    EmptyOptionText,

    #[error("question needs at least two options, got {0}")]
    NotEnoughOptions(usize),

    #[error("duplicate option id {0} within one question")]
    DuplicateOption(OptionId),

    #[error("question has no correct option")]
    NoCorrectOption,

    #[error("question has more than one correct option")]
    MultipleCorrectOptions,

    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,
}

//
// ─── ANSWER OPTION ─────────────────────────────────────────────────────────────
//

/// One selectable choice attached to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }
}

//
// ─── QUIZ QUESTION ─────────────────────────────────────────────────────────────
//

/// A multiple-choice question as presented during a quiz.
///
/// Questions are immutable once constructed: option order, the per-question
/// time limit, and the point value are fixed at fetch time and never change
/// during a session. Construction enforces that exactly one option is marked
/// correct, so correctness checks later on never need to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    id: QuestionId,
    category_id: CategoryId,
    category_name: String,
    text: String,
    options: Vec<AnswerOption>,
    correct_option_id: OptionId,
    time_limit_secs: u32,
    points: u32,
}

impl QuizQuestion {
    /// Creates a new question, validating the option set.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is blank, fewer than two options are
    /// given, any option text is blank, option ids repeat, the number of
    /// options marked correct is not exactly one, or the time limit is zero.
    /// A zero point value is allowed (practice questions score nothing).
    pub fn new(
        id: QuestionId,
        category_id: CategoryId,
        category_name: impl Into<String>,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
        time_limit_secs: u32,
        points: u32,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::NotEnoughOptions(options.len()));
        }
        if time_limit_secs == 0 {
            return Err(QuestionError::InvalidTimeLimit);
        }

        let mut correct_option_id = None;
        for (i, option) in options.iter().enumerate() {
            if option.text.trim().is_empty() {
                return Err(QuestionError::EmptyOptionText);
            }
            if options[..i].iter().any(|prev| prev.id == option.id) {
                return Err(QuestionError::DuplicateOption(option.id));
            }
            if option.is_correct {
                if correct_option_id.is_some() {
                    return Err(QuestionError::MultipleCorrectOptions);
                }
                correct_option_id = Some(option.id);
            }
        }
        let Some(correct_option_id) = correct_option_id else {
            return Err(QuestionError::NoCorrectOption);
        };

        Ok(Self {
            id,
            category_id,
            category_name: category_name.into(),
            text: text.trim().to_owned(),
            options,
            correct_option_id,
            time_limit_secs,
            points,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
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
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Options in presentation order.
    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Id of the single option marked correct.
    #[must_use]
    pub fn correct_option_id(&self) -> OptionId {
        self.correct_option_id
    }

    /// Whether selecting `id` would answer this question correctly.
    ///
    /// An id that does not belong to this question is simply wrong, not an
    /// error; membership is validated where answers are recorded.
    #[must_use]
    pub fn is_correct_choice(&self, id: OptionId) -> bool {
        self.correct_option_id == id
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_options() -> Vec<AnswerOption> {
        vec![
            AnswerOption::new(OptionId::new(1), "114", true),
            AnswerOption::new(OptionId::new(2), "99", false),
            AnswerOption::new(OptionId::new(3), "100", false),
        ]
    }

    fn build_question(options: Vec<AnswerOption>) -> Result<QuizQuestion, QuestionError> {
        QuizQuestion::new(
            QuestionId::new(1),
            CategoryId::new(7),
            "Quran",
            "How many surahs does the Quran contain?",
            options,
            30,
            10,
        )
    }

    #[test]
    fn question_new_happy_path() {
        let question = build_question(build_options()).unwrap();

        assert_eq!(question.id(), QuestionId::new(1));
        assert_eq!(question.category_name(), "Quran");
        assert_eq!(question.options().len(), 3);
        assert_eq!(question.correct_option_id(), OptionId::new(1));
        assert_eq!(question.time_limit_secs(), 30);
        assert_eq!(question.points(), 10);
    }

    #[test]
    fn question_rejects_empty_text() {
        let err = QuizQuestion::new(
            QuestionId::new(1),
            CategoryId::new(7),
            "Quran",
            "   ",
            build_options(),
            30,
            10,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn question_rejects_single_option() {
        let options = vec![AnswerOption::new(OptionId::new(1), "114", true)];
        let err = build_question(options).unwrap_err();
        assert_eq!(err, QuestionError::NotEnoughOptions(1));
    }

    #[test]
    fn question_rejects_blank_option_text() {
        let options = vec![
            AnswerOption::new(OptionId::new(1), "114", true),
            AnswerOption::new(OptionId::new(2), "  ", false),
        ];
        let err = build_question(options).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOptionText);
    }

    #[test]
    fn question_rejects_duplicate_option_ids() {
        let options = vec![
            AnswerOption::new(OptionId::new(1), "114", true),
            AnswerOption::new(OptionId::new(1), "99", false),
        ];
        let err = build_question(options).unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption(OptionId::new(1)));
    }

    #[test]
    fn question_rejects_no_correct_option() {
        let options = vec![
            AnswerOption::new(OptionId::new(1), "114", false),
            AnswerOption::new(OptionId::new(2), "99", false),
        ];
        let err = build_question(options).unwrap_err();
        assert_eq!(err, QuestionError::NoCorrectOption);
    }

    #[test]
    fn question_rejects_two_correct_options() {
        let options = vec![
            AnswerOption::new(OptionId::new(1), "114", true),
            AnswerOption::new(OptionId::new(2), "99", true),
        ];
        let err = build_question(options).unwrap_err();
        assert_eq!(err, QuestionError::MultipleCorrectOptions);
    }

    #[test]
    fn question_rejects_zero_time_limit() {
        let err = QuizQuestion::new(
            QuestionId::new(1),
            CategoryId::new(7),
            "Quran",
            "How many surahs does the Quran contain?",
            build_options(),
            0,
            10,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::InvalidTimeLimit);
    }

    #[test]
    fn question_allows_zero_points() {
        let question = QuizQuestion::new(
            QuestionId::new(1),
            CategoryId::new(7),
            "Quran",
            "Practice: how many surahs?",
            build_options(),
            30,
            0,
        )
        .unwrap();
        assert_eq!(question.points(), 0);
    }

    #[test]
    fn correctness_check_matches_flagged_option() {
        let question = build_question(build_options()).unwrap();

        assert!(question.is_correct_choice(OptionId::new(1)));
        assert!(!question.is_correct_choice(OptionId::new(2)));
        assert!(!question.is_correct_choice(OptionId::new(42)));
    }

    #[test]
    fn option_lookup_by_id() {
        let question = build_question(build_options()).unwrap();

        assert_eq!(question.option(OptionId::new(2)).unwrap().text, "99");
        assert!(question.option(OptionId::new(42)).is_none());
    }
}
