//! Wire shapes for the quiz backend.
//!
//! Deployed backends disagree on field names ("question" vs "text",
//! "timeLimit" vs "time_limit", envelopes keyed "data" vs "questions").
//! Everything is absorbed here, once, through serde aliases and explicit
//! conversions; the rest of the crate only ever sees the fixed domain
//! model.

use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AnswerReview, AttemptId, Category, CategoryId, OptionId, QuestionId, QuizQuestion,
    ScoreSummary,
};

use crate::provider::{AnswerSubmission, ProviderError};

//
// ─── RESPONSE SHAPES ───────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(alias = "data", alias = "results")]
    pub categories: Vec<CategoryDto>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryDto {
    #[serde(alias = "category_id", alias = "categoryId")]
    pub id: CategoryId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "questionCount", alias = "total_questions")]
    pub question_count: u32,
}

impl CategoryDto {
    pub fn into_category(self) -> Result<Category, ProviderError> {
        let id = self.id;
        Category::new(id, self.name, self.description, self.question_count)
            .map_err(|e| ProviderError::Decode(format!("category {id}: {e}")))
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionsEnvelope {
    #[serde(alias = "data", alias = "results")]
    pub questions: Vec<QuestionDto>,
    /// Some backends repeat the category name once at the top level
    /// instead of on every question.
    #[serde(default, alias = "categoryName", alias = "category_title")]
    pub category_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionDto {
    #[serde(alias = "question_id", alias = "questionId")]
    pub id: QuestionId,
    #[serde(default, alias = "categoryId", alias = "category")]
    pub category_id: Option<CategoryId>,
    #[serde(default, alias = "categoryName", alias = "category_title")]
    pub category_name: Option<String>,
    #[serde(alias = "question", alias = "question_text")]
    pub text: String,
    #[serde(alias = "answers", alias = "choices")]
    pub options: Vec<OptionDto>,
    #[serde(alias = "timeLimit", alias = "time_limit", alias = "duration_secs")]
    pub time_limit_secs: u32,
    #[serde(alias = "score", alias = "point_value")]
    pub points: u32,
}

#[derive(Debug, Deserialize)]
pub struct OptionDto {
    #[serde(alias = "option_id", alias = "optionId")]
    pub id: OptionId,
    #[serde(alias = "option", alias = "label")]
    pub text: String,
    /// Backends that only flag the right choice omit the field elsewhere.
    #[serde(default, alias = "isCorrect", alias = "correct")]
    pub is_correct: bool,
}

#[derive(Debug, Deserialize)]
pub struct AttemptEnvelope {
    #[serde(alias = "id", alias = "attemptId")]
    pub attempt_id: AttemptId,
}

#[derive(Debug, Deserialize)]
pub struct ScoreSummaryDto {
    #[serde(alias = "totalQuestions", alias = "total")]
    pub total_questions: u32,
    #[serde(alias = "correctAnswers", alias = "correct")]
    pub correct_answers: u32,
    #[serde(alias = "points", alias = "earned_score")]
    pub score: u32,
    #[serde(alias = "is_passed", alias = "pass")]
    pub passed: bool,
}

impl ScoreSummaryDto {
    #[must_use]
    pub fn into_summary(self) -> ScoreSummary {
        ScoreSummary::new(
            self.total_questions,
            self.correct_answers,
            self.score,
            self.passed,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewEnvelope {
    #[serde(alias = "data", alias = "answers")]
    pub reviews: Vec<ReviewEntryDto>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewEntryDto {
    #[serde(alias = "questionId")]
    pub question_id: QuestionId,
    #[serde(default, alias = "selectedOptionId", alias = "selected_option_id")]
    pub selected_option: Option<OptionId>,
    #[serde(alias = "isCorrect", alias = "correct")]
    pub is_correct: bool,
}

impl ReviewEntryDto {
    #[must_use]
    pub fn into_review(self) -> AnswerReview {
        AnswerReview::new(self.question_id, self.selected_option, self.is_correct)
    }
}

//
// ─── BUNDLED QUESTION SET ──────────────────────────────────────────────────────
//

/// Shape of the question set shipped inside the binary. Questions inherit
/// the category id and name from their enclosing entry.
#[derive(Debug, Deserialize)]
pub struct BundleDto {
    pub categories: Vec<BundleCategoryDto>,
}

#[derive(Debug, Deserialize)]
pub struct BundleCategoryDto {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<QuestionDto>,
}

//
// ─── REQUEST SHAPES ────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub struct StartAttemptRequest {
    pub category_id: CategoryId,
}

#[derive(Debug, Serialize)]
pub struct SubmitRequest {
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<OptionId>,
    pub time_taken_secs: u32,
}

impl SubmittedAnswer {
    #[must_use]
    pub fn from_submission(submission: &AnswerSubmission) -> Self {
        Self {
            question_id: submission.question_id,
            selected_option_id: submission.selected_option,
            time_taken_secs: submission.time_taken_secs,
        }
    }
}

//
// ─── CONVERSIONS ───────────────────────────────────────────────────────────────
//

/// Converts one wire question into the domain model.
///
/// Category id and name fall back to the request context when the payload
/// does not carry them per question.
///
/// # Errors
///
/// Returns `ProviderError::Decode` when the payload values do not form a
/// valid question (blank text, no/duplicate correct option, zero time
/// limit, fewer than two options).
pub fn question_from_dto(
    dto: QuestionDto,
    default_category: CategoryId,
    default_category_name: &str,
) -> Result<QuizQuestion, ProviderError> {
    let id = dto.id;
    let options = dto
        .options
        .into_iter()
        .map(|o| quiz_core::model::AnswerOption::new(o.id, o.text, o.is_correct))
        .collect();

    QuizQuestion::new(
        id,
        dto.category_id.unwrap_or(default_category),
        dto.category_name
            .unwrap_or_else(|| default_category_name.to_owned()),
        dto.text,
        options,
        dto.time_limit_secs,
        dto.points,
    )
    .map_err(|e| ProviderError::Decode(format!("question {id}: {e}")))
}

/// Converts a whole questions response for one category.
///
/// # Errors
///
/// Returns `ProviderError::Decode` when any entry fails validation.
pub fn questions_from_envelope(
    envelope: QuestionsEnvelope,
    category_id: CategoryId,
) -> Result<Vec<QuizQuestion>, ProviderError> {
    let category_name = envelope.category_name.unwrap_or_default();
    envelope
        .questions
        .into_iter()
        .map(|dto| question_from_dto(dto, category_id, &category_name))
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_canonical_question_payload() {
        let json = r#"{
            "category_name": "Quran",
            "questions": [{
                "id": 1,
                "text": "How many surahs does the Quran contain?",
                "options": [
                    {"id": 11, "text": "114", "is_correct": true},
                    {"id": 12, "text": "99", "is_correct": false}
                ],
                "time_limit_secs": 30,
                "points": 10
            }]
        }"#;

        let envelope: QuestionsEnvelope = serde_json::from_str(json).unwrap();
        let questions = questions_from_envelope(envelope, CategoryId::new(7)).unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id(), QuestionId::new(1));
        assert_eq!(questions[0].category_id(), CategoryId::new(7));
        assert_eq!(questions[0].category_name(), "Quran");
        assert_eq!(questions[0].correct_option_id(), OptionId::new(11));
    }

    #[test]
    fn decodes_aliased_question_payload() {
        // camelCase envelope keyed "data", per-question category fields,
        // options keyed "answers" with bare "correct" flags
        let json = r#"{
            "data": [{
                "questionId": 2,
                "categoryId": 9,
                "categoryName": "Fiqh",
                "question": "How many daily prayers are obligatory?",
                "answers": [
                    {"optionId": 21, "label": "Five", "correct": true},
                    {"optionId": 22, "label": "Three"}
                ],
                "timeLimit": 20,
                "score": 5
            }]
        }"#;

        let envelope: QuestionsEnvelope = serde_json::from_str(json).unwrap();
        let questions = questions_from_envelope(envelope, CategoryId::new(1)).unwrap();

        let question = &questions[0];
        assert_eq!(question.id(), QuestionId::new(2));
        assert_eq!(question.category_id(), CategoryId::new(9));
        assert_eq!(question.category_name(), "Fiqh");
        assert_eq!(question.time_limit_secs(), 20);
        assert_eq!(question.points(), 5);
        assert!(!question.options()[1].is_correct);
    }

    #[test]
    fn rejects_question_without_correct_option() {
        let json = r#"{
            "questions": [{
                "id": 3,
                "text": "Broken question",
                "options": [
                    {"id": 31, "text": "A"},
                    {"id": 32, "text": "B"}
                ],
                "time_limit_secs": 30,
                "points": 10
            }]
        }"#;

        let envelope: QuestionsEnvelope = serde_json::from_str(json).unwrap();
        let err = questions_from_envelope(envelope, CategoryId::new(1)).unwrap_err();

        assert!(matches!(err, ProviderError::Decode(_)));
        assert!(err.to_string().contains("question 3"));
    }

    #[test]
    fn decodes_aliased_score_summary() {
        let json = r#"{"totalQuestions": 5, "correctAnswers": 3, "points": 30, "is_passed": true}"#;
        let dto: ScoreSummaryDto = serde_json::from_str(json).unwrap();
        let summary = dto.into_summary();

        assert_eq!(summary.total_questions, 5);
        assert_eq!(summary.correct_answers, 3);
        assert_eq!(summary.score, 30);
        assert!(summary.passed);
    }

    #[test]
    fn decodes_attempt_id_under_either_key() {
        let bare: AttemptEnvelope = serde_json::from_str(r#"{"id": 77}"#).unwrap();
        assert_eq!(bare.attempt_id, AttemptId::new(77));

        let keyed: AttemptEnvelope = serde_json::from_str(r#"{"attemptId": 78}"#).unwrap();
        assert_eq!(keyed.attempt_id, AttemptId::new(78));
    }

    #[test]
    fn submit_request_omits_missing_selection() {
        let request = SubmitRequest {
            answers: vec![
                SubmittedAnswer::from_submission(&AnswerSubmission::new(
                    QuestionId::new(1),
                    Some(OptionId::new(11)),
                    9,
                )),
                SubmittedAnswer::from_submission(&AnswerSubmission::new(
                    QuestionId::new(2),
                    None,
                    30,
                )),
            ],
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""selected_option_id":11"#));
        assert!(!json.contains("null"));
        assert!(json.contains(r#""time_taken_secs":30"#));
    }

    #[test]
    fn decodes_review_entries() {
        let json = r#"{
            "answers": [
                {"questionId": 1, "selectedOptionId": 11, "isCorrect": true},
                {"questionId": 2, "isCorrect": false}
            ]
        }"#;

        let envelope: ReviewEnvelope = serde_json::from_str(json).unwrap();
        let reviews: Vec<_> = envelope
            .reviews
            .into_iter()
            .map(ReviewEntryDto::into_review)
            .collect();

        assert_eq!(reviews[0].selected_option, Some(OptionId::new(11)));
        assert!(reviews[0].is_correct);
        assert_eq!(reviews[1].selected_option, None);
        assert!(!reviews[1].is_correct);
    }

    #[test]
    fn decodes_category_listing() {
        let json = r#"{
            "data": [
                {"categoryId": 1, "title": "Creed", "questionCount": 12},
                {"id": 2, "name": "Fiqh", "description": "rules of worship", "total_questions": 8}
            ]
        }"#;

        let envelope: CategoriesEnvelope = serde_json::from_str(json).unwrap();
        let categories: Vec<_> = envelope
            .categories
            .into_iter()
            .map(|dto| dto.into_category().unwrap())
            .collect();

        assert_eq!(categories[0].name(), "Creed");
        assert_eq!(categories[0].question_count(), 12);
        assert_eq!(categories[1].id(), CategoryId::new(2));
        assert_eq!(categories[1].description(), Some("rules of worship"));
    }
}
