use async_trait::async_trait;
use reqwest::Client;

use quiz_core::model::{AnswerReview, AttemptId, CategoryId, ScoreSummary};

use crate::http::ApiConfig;
use crate::provider::{AnswerSubmission, SubmissionError, SubmissionService};
use crate::wire;

/// Scoring backend reached over the quiz HTTP API.
#[derive(Clone)]
pub struct HttpSubmissionService {
    client: Client,
    config: ApiConfig,
}

impl HttpSubmissionService {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SubmissionService for HttpSubmissionService {
    async fn start_attempt(&self, category_id: CategoryId) -> Result<AttemptId, SubmissionError> {
        let url = self.config.endpoint("quiz/attempts");
        let payload = wire::StartAttemptRequest { category_id };
        let response = self
            .config
            .prepare(self.client.post(url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| SubmissionError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SubmissionError::Status(response.status()));
        }

        let envelope: wire::AttemptEnvelope = response
            .json()
            .await
            .map_err(|e| SubmissionError::Decode(e.to_string()))?;
        Ok(envelope.attempt_id)
    }

    async fn submit_answers(
        &self,
        attempt_id: AttemptId,
        answers: &[AnswerSubmission],
    ) -> Result<ScoreSummary, SubmissionError> {
        let url = self
            .config
            .endpoint(&format!("quiz/attempts/{attempt_id}/submit"));
        let payload = wire::SubmitRequest {
            answers: answers
                .iter()
                .map(wire::SubmittedAnswer::from_submission)
                .collect(),
        };

        let response = self
            .config
            .prepare(self.client.post(url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| SubmissionError::Request(e.to_string()))?;

        if !response.status().is_success() {
            tracing::error!(
                "Scoring rejected attempt {}: status {}",
                attempt_id,
                response.status()
            );
            return Err(SubmissionError::Status(response.status()));
        }

        let dto: wire::ScoreSummaryDto = response
            .json()
            .await
            .map_err(|e| SubmissionError::Decode(e.to_string()))?;
        Ok(dto.into_summary())
    }

    async fn review_attempt(
        &self,
        attempt_id: AttemptId,
    ) -> Result<Vec<AnswerReview>, SubmissionError> {
        let url = self
            .config
            .endpoint(&format!("quiz/attempts/{attempt_id}/review"));
        let response = self
            .config
            .prepare(self.client.get(url))
            .send()
            .await
            .map_err(|e| SubmissionError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SubmissionError::Status(response.status()));
        }

        let envelope: wire::ReviewEnvelope = response
            .json()
            .await
            .map_err(|e| SubmissionError::Decode(e.to_string()))?;
        Ok(envelope
            .reviews
            .into_iter()
            .map(wire::ReviewEntryDto::into_review)
            .collect())
    }
}
