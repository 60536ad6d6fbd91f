#![forbid(unsafe_code)]

pub mod http;
pub mod provider;
mod static_provider;
mod wire;

pub use http::{ApiConfig, ConfigError, HttpQuestionProvider, HttpSubmissionService};
pub use provider::{
    AnswerSubmission, ProviderError, QuestionProvider, SubmissionError, SubmissionService,
};
pub use static_provider::StaticQuestionProvider;
