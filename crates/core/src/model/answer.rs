use crate::model::ids::{OptionId, QuestionId};

//
// ─── USER ANSWER ───────────────────────────────────────────────────────────────
//

/// What the user did with one question: picked an option or skipped it.
///
/// The two constructors are the only way to build a record, which keeps the
/// coupled fields honest: a missing selection always means skipped and never
/// correct, and a recorded selection is never marked skipped. Correctness is
/// decided by the caller against the question's flagged option at recording
/// time, not re-derived later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAnswer {
    question_id: QuestionId,
    selected_option: Option<OptionId>,
    is_correct: bool,
    time_taken_secs: u32,
    skipped: bool,
}

impl UserAnswer {
    /// Records a selected option.
    #[must_use]
    pub fn answered(
        question_id: QuestionId,
        selected_option: OptionId,
        is_correct: bool,
        time_taken_secs: u32,
    ) -> Self {
        Self {
            question_id,
            selected_option: Some(selected_option),
            is_correct,
            time_taken_secs,
            skipped: false,
        }
    }

    /// Records an explicit skip (user choice or timer expiry).
    #[must_use]
    pub fn skipped(question_id: QuestionId, time_taken_secs: u32) -> Self {
        Self {
            question_id,
            selected_option: None,
            is_correct: false,
            time_taken_secs,
            skipped: true,
        }
    }

    // Accessors
    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<OptionId> {
        self.selected_option
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.time_taken_secs
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// True when an option was actually selected.
    #[must_use]
    pub fn is_attempted(&self) -> bool {
        self.selected_option.is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
