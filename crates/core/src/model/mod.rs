mod answer;
mod category;
mod ids;
mod question;
mod result;

pub use ids::{AttemptId, CategoryId, OptionId, ParseIdError, QuestionId};

pub use answer::UserAnswer;
pub use category::{Category, CategoryError};
pub use question::{AnswerOption, QuestionError, QuizQuestion};
pub use result::{
    AnswerReview, PASS_MARK_PERCENT, QuizResult, ResultError, ScoreSource, ScoreSummary,
};
