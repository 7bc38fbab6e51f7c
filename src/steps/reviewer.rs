use tracing::{debug, info};

use crate::error::{ServiceError, WorkflowError};
use crate::model::Review;
use crate::structured::StructuredGenerator;
use crate::workflow::{ReviewUpdate, WorkflowState};

pub const REVIEWER_SYSTEM_PROMPT: &str = "\
You are an educational content reviewer.

Review the generated content for:
- Grade appropriateness
- Concept coverage
- MCQ correctness and clarity

If all criteria are met, return status \"pass\".
Otherwise, return status \"fail\" with actionable feedback.
";

/// Runs the review step over the current content.
///
/// Fails with [`WorkflowError::MissingGeneratorOutput`] before contacting the
/// service when no content has been generated yet.
pub async fn review(
    state: &WorkflowState,
    service: &impl StructuredGenerator,
) -> Result<ReviewUpdate, WorkflowError> {
    let content = state
        .generator_output
        .as_ref()
        .ok_or(WorkflowError::MissingGeneratorOutput)?;

    let rendered = content.to_pretty_json().map_err(|e| {
        WorkflowError::Review(ServiceError::Malformed {
            schema: "Content",
            reason: e.to_string(),
        })
    })?;
    let user = format!(
        "Grade: {}\nTopic: {}\n\nGenerated Content:\n{rendered}\n",
        state.grade, state.topic
    );
    debug!(grade = state.grade, topic = %state.topic, bytes = user.len(), "reviewer prompt");

    let review = service
        .generate::<Review>(REVIEWER_SYSTEM_PROMPT, &user)
        .await
        .map_err(WorkflowError::Review)?;

    info!(status = %review.status, feedback = review.feedback.len(), "content reviewed");
    Ok(ReviewUpdate {
        reviewer_output: review,
    })
}
