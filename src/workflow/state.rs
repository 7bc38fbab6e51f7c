use serde::{Deserialize, Serialize};

use crate::model::{Content, Review};

/// Mutable state of one invocation.
///
/// Created fresh for every request and owned by the controller until it is
/// handed back to the caller at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub grade: u8,
    pub topic: String,
    pub generator_output: Option<Content>,
    pub reviewer_output: Option<Review>,
    pub retry_count: u32,
}

/// Partial update returned by the generation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpdate {
    pub generator_output: Content,
}

/// Partial update returned by the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub reviewer_output: Review,
}

impl WorkflowState {
    pub fn new(grade: u8, topic: impl Into<String>) -> Self {
        Self {
            grade,
            topic: topic.into(),
            generator_output: None,
            reviewer_output: None,
            retry_count: 0,
        }
    }

    /// Replaces the previous content wholesale.
    pub fn apply_content(&mut self, update: ContentUpdate) {
        self.generator_output = Some(update.generator_output);
    }

    /// Replaces the previous review wholesale.
    pub fn apply_review(&mut self, update: ReviewUpdate) {
        self.reviewer_output = Some(update.reviewer_output);
    }

    /// Feedback of the most recent review, if there is one.
    pub fn prior_feedback(&self) -> Option<&[String]> {
        self.reviewer_output
            .as_ref()
            .map(|r| r.feedback.as_slice())
            .filter(|fb| !fb.is_empty())
    }

    /// `true` when the last review passed.
    pub fn passed_review(&self) -> bool {
        self.reviewer_output.as_ref().is_some_and(Review::passed)
    }
}
