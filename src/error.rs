use thiserror::Error;

use crate::anthropic::AnthropicError;

#[derive(Debug, Error)]
pub enum EdugenError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the structured-generation service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Anthropic API error: {0}")]
    Api(#[from] AnthropicError),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("model output was cut off at max_tokens")]
    Truncated,

    #[error("{schema} output does not match its schema: {reason}")]
    Malformed {
        schema: &'static str,
        reason: String,
    },
}

/// Everything that can abort one invocation of the content workflow.
///
/// A review that still fails after the retry is not an error; see
/// [`Outcome::FailedReview`](crate::orchestrator::Outcome::FailedReview).
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generation failed: {0}")]
    Generation(ServiceError),

    #[error("Generated content is invalid: {}", .0.join("; "))]
    InvalidContent(Vec<String>),

    #[error("Reviewer called without generator output")]
    MissingGeneratorOutput,

    #[error("Review failed: {0}")]
    Review(ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_content_joins_messages() {
        let err = WorkflowError::InvalidContent(vec![
            "MCQ 1 has no options".into(),
            "MCQ 3 has no options".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Generated content is invalid: MCQ 1 has no options; MCQ 3 has no options"
        );
    }

    #[test]
    fn generation_error_wraps_service_error() {
        let err = WorkflowError::Generation(ServiceError::Malformed {
            schema: "Content",
            reason: "missing field `mcqs`".into(),
        });
        assert_eq!(
            err.to_string(),
            "Generation failed: Content output does not match its schema: missing field `mcqs`"
        );
    }

    #[test]
    fn service_error_from_anthropic() {
        let err: ServiceError = AnthropicError::Timeout.into();
        assert!(matches!(err, ServiceError::Api(AnthropicError::Timeout)));
    }
}
