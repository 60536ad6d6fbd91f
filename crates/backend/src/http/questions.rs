use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use quiz_core::model::{Category, CategoryId, QuizQuestion};

use crate::http::ApiConfig;
use crate::provider::{ProviderError, QuestionProvider};
use crate::wire;

/// Question source backed by the quiz HTTP API.
#[derive(Clone)]
pub struct HttpQuestionProvider {
    client: Client,
    config: ApiConfig,
}

impl HttpQuestionProvider {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl QuestionProvider for HttpQuestionProvider {
    async fn fetch_questions(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<QuizQuestion>, ProviderError> {
        let url = self
            .config
            .endpoint(&format!("quiz/categories/{category_id}/questions"));
        let response = self
            .config
            .prepare(self.client.get(url))
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let envelope: wire::QuestionsEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        let questions = wire::questions_from_envelope(envelope, category_id)?;
        tracing::debug!(
            "Fetched {} questions for category {}",
            questions.len(),
            category_id
        );
        Ok(questions)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ProviderError> {
        let url = self.config.endpoint("quiz/categories");
        let response = self
            .config
            .prepare(self.client.get(url))
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let envelope: wire::CategoriesEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        envelope
            .categories
            .into_iter()
            .map(wire::CategoryDto::into_category)
            .collect()
    }
}
