use std::collections::HashMap;

use async_trait::async_trait;

use quiz_core::model::{Category, CategoryId, QuizQuestion};

use crate::provider::{ProviderError, QuestionProvider};
use crate::wire;

/// Question source served entirely from memory.
///
/// Carries the question set shipped with the app for offline use, and
/// doubles as a deterministic source in tests. A registered category with
/// no questions resolves to an empty list; an unknown id is `NotFound`.
#[derive(Clone, Default)]
pub struct StaticQuestionProvider {
    categories: Vec<Category>,
    questions: HashMap<CategoryId, Vec<QuizQuestion>>,
}

impl StaticQuestionProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category and its questions, in presentation order.
    #[must_use]
    pub fn with_category(mut self, category: Category, questions: Vec<QuizQuestion>) -> Self {
        self.questions.insert(category.id(), questions);
        self.categories.push(category);
        self
    }

    /// Loads the question set embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Decode` if the embedded asset is malformed.
    pub fn bundled() -> Result<Self, ProviderError> {
        let bundle: wire::BundleDto = serde_json::from_str(include_str!("data/questions.json"))
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let mut provider = Self::new();
        for entry in bundle.categories {
            let wire::BundleCategoryDto {
                id,
                name,
                description,
                questions,
            } = entry;

            let questions = questions
                .into_iter()
                .map(|dto| wire::question_from_dto(dto, id, &name))
                .collect::<Result<Vec<_>, _>>()?;
            let count = u32::try_from(questions.len()).unwrap_or(u32::MAX);
            let category = Category::new(id, name, description, count)
                .map_err(|e| ProviderError::Decode(format!("category {id}: {e}")))?;

            provider = provider.with_category(category, questions);
        }
        Ok(provider)
    }
}

#[async_trait]
impl QuestionProvider for StaticQuestionProvider {
    async fn fetch_questions(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<QuizQuestion>, ProviderError> {
        self.questions
            .get(&category_id)
            .cloned()
            .ok_or(ProviderError::NotFound)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ProviderError> {
        Ok(self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, OptionId, QuestionId};

    fn build_category(id: u64, name: &str, count: u32) -> Category {
        Category::new(CategoryId::new(id), name, None, count).unwrap()
    }

    fn build_question(id: u64, category: &Category) -> QuizQuestion {
        QuizQuestion::new(
            QuestionId::new(id),
            category.id(),
            category.name(),
            format!("question {id}"),
            vec![
                AnswerOption::new(OptionId::new(id * 10 + 1), "yes", true),
                AnswerOption::new(OptionId::new(id * 10 + 2), "no", false),
            ],
            30,
            10,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn serves_registered_questions_in_order() {
        let category = build_category(1, "Creed", 2);
        let questions = vec![build_question(1, &category), build_question(2, &category)];
        let provider =
            StaticQuestionProvider::new().with_category(category.clone(), questions.clone());

        let fetched = provider.fetch_questions(category.id()).await.unwrap();
        assert_eq!(fetched, questions);

        let listed = provider.list_categories().await.unwrap();
        assert_eq!(listed, vec![category]);
    }

    #[tokio::test]
    async fn unknown_category_is_not_found() {
        let provider = StaticQuestionProvider::new();
        let err = provider
            .fetch_questions(CategoryId::new(99))
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::NotFound);
    }

    #[tokio::test]
    async fn registered_empty_category_yields_empty_list() {
        let category = build_category(3, "Seerah", 0);
        let provider = StaticQuestionProvider::new().with_category(category.clone(), vec![]);

        let fetched = provider.fetch_questions(category.id()).await.unwrap();
        assert!(fetched.is_empty());
    }
}
