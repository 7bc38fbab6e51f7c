use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::WorkflowError;
use crate::model::Content;
use crate::structured::StructuredGenerator;
use crate::workflow::{ContentUpdate, WorkflowState};

pub const GENERATOR_SYSTEM_PROMPT: &str = "\
You are an educational content generation agent.

Generate structured educational content for the given grade and topic.
Follow the provided output schema strictly.

Rules:
- Use grade-appropriate language
- Introduce concepts before questions
- Keep explanations concise
- MCQs must be based only on the explanation
";

/// When reviewer feedback is forwarded to the generator.
///
/// `Legacy` only forwards it while `retry_count == 0`. The controller bumps
/// the counter before routing back, so on the retry pass the feedback is
/// dropped. `OnRetry` forwards it whenever a previous review left any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackPolicy {
    #[default]
    Legacy,
    OnRetry,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorOptions {
    pub feedback: FeedbackPolicy,
    /// Reject content whose MCQ answers are not among their options.
    pub validate_answers: bool,
}

/// Runs the generation step and returns the content that replaces the
/// previous one.
pub async fn generate(
    state: &WorkflowState,
    service: &impl StructuredGenerator,
    options: &GeneratorOptions,
) -> Result<ContentUpdate, WorkflowError> {
    let user = user_message(state, options.feedback);
    debug!(grade = state.grade, topic = %state.topic, prompt = %user, "generator prompt");

    let content = service
        .generate::<Content>(GENERATOR_SYSTEM_PROMPT, &user)
        .await
        .map_err(WorkflowError::Generation)?;

    if options.validate_answers {
        let violations = content.answer_violations();
        if !violations.is_empty() {
            return Err(WorkflowError::InvalidContent(violations));
        }
    }

    info!(mcqs = content.mcqs.len(), "content generated");
    Ok(ContentUpdate {
        generator_output: content,
    })
}

fn user_message(state: &WorkflowState, policy: FeedbackPolicy) -> String {
    let mut msg = format!("Grade: {}\nTopic: {}\n", state.grade, state.topic);
    if let Some(block) = feedback_block(state, policy) {
        msg.push_str(&block);
    }
    msg
}

fn feedback_block(state: &WorkflowState, policy: FeedbackPolicy) -> Option<String> {
    let feedback = state.prior_feedback()?;
    let attach = match policy {
        FeedbackPolicy::Legacy => state.retry_count == 0,
        FeedbackPolicy::OnRetry => true,
    };
    if !attach {
        warn!(
            retry_count = state.retry_count,
            items = feedback.len(),
            "reviewer feedback not forwarded to generator (legacy feedback policy)"
        );
        return None;
    }

    let mut block = String::from(
        "\nThe previous output failed review.\nFix only the issues listed below:\n",
    );
    for item in feedback {
        block.push_str("- ");
        block.push_str(item);
        block.push('\n');
    }
    Some(block)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{Review, ReviewStatus};
    use crate::structured::mock::ScriptedGenerator;
    use crate::workflow::ReviewUpdate;

    fn failed_state(retry_count: u32) -> WorkflowState {
        let mut state = WorkflowState::new(5, "Fractions");
        state.apply_review(ReviewUpdate {
            reviewer_output: Review {
                status: ReviewStatus::Fail,
                feedback: vec![
                    "MCQ 2 unanswerable from explanation".into(),
                    "Define the denominator".into(),
                ],
            },
        });
        state.retry_count = retry_count;
        state
    }

    fn sample_content() -> serde_json::Value {
        json!({
            "explanation": "A fraction has a numerator and a denominator.",
            "mcqs": [{
                "question": "What is the bottom number of a fraction called?",
                "options": ["Numerator", "Denominator"],
                "answer": "Denominator"
            }]
        })
    }

    #[test]
    fn first_pass_message_has_grade_and_topic_only() {
        let state = WorkflowState::new(3, "Types of angles");
        let msg = user_message(&state, FeedbackPolicy::Legacy);
        assert_eq!(msg, "Grade: 3\nTopic: Types of angles\n");
    }

    #[test]
    fn legacy_policy_drops_feedback_on_retry_pass() {
        let state = failed_state(1);
        let msg = user_message(&state, FeedbackPolicy::Legacy);
        assert!(!msg.contains("failed review"));
    }

    #[test]
    fn legacy_policy_attaches_while_counter_is_zero() {
        let state = failed_state(0);
        let msg = user_message(&state, FeedbackPolicy::Legacy);
        assert!(msg.contains("The previous output failed review."));
    }

    #[test]
    fn on_retry_policy_lists_each_comment() {
        let state = failed_state(1);
        let msg = user_message(&state, FeedbackPolicy::OnRetry);
        assert!(msg.starts_with("Grade: 5\nTopic: Fractions\n"));
        assert!(msg.contains("Fix only the issues listed below:\n"));
        assert!(msg.contains("- MCQ 2 unanswerable from explanation\n"));
        assert!(msg.contains("- Define the denominator\n"));
    }

    #[tokio::test]
    async fn generate_returns_content_update() {
        let service = ScriptedGenerator::new().respond(sample_content());
        let state = WorkflowState::new(5, "Fractions");
        let update = generate(&state, &service, &GeneratorOptions::default())
            .await
            .unwrap();
        assert_eq!(update.generator_output.mcqs.len(), 1);

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].schema, "Content");
        assert_eq!(calls[0].system, GENERATOR_SYSTEM_PROMPT);
        assert!(calls[0].user.contains("Topic: Fractions"));
    }

    #[tokio::test]
    async fn service_failure_is_generation_error() {
        let service = ScriptedGenerator::new().fail("upstream down");
        let state = WorkflowState::new(5, "Fractions");
        let err = generate(&state, &service, &GeneratorOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Generation(_)));
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn answer_validation_is_opt_in() {
        let bad = json!({
            "explanation": "e",
            "mcqs": [{"question": "q", "options": ["a", "b"], "answer": "c"}]
        });
        let state = WorkflowState::new(2, "Shapes");

        let service = ScriptedGenerator::new().respond(bad.clone());
        assert!(
            generate(&state, &service, &GeneratorOptions::default())
                .await
                .is_ok()
        );

        let service = ScriptedGenerator::new().respond(bad);
        let options = GeneratorOptions {
            validate_answers: true,
            ..Default::default()
        };
        let err = generate(&state, &service, &options).await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidContent(v) if v.len() == 1));
    }
}
