use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::steps::{self, GeneratorOptions};
use crate::structured::StructuredGenerator;
use crate::workflow::{Node, StateMachine, Transition, WorkflowState};

/// How an invocation that produced content ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    /// The retry was used up and the last content still failed review.
    FailedReview,
}

/// One line of the execution log shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Everything the caller gets back from a finished invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationReport {
    pub id: Uuid,
    pub state: WorkflowState,
    pub outcome: Outcome,
    /// Nodes visited in order, ending with [`Node::End`].
    pub path: Vec<Node>,
    pub log: Vec<LogEntry>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

/// Callback for progress reporting as the workflow moves between nodes.
pub trait ProgressSink {
    fn on_node(&self, _node: Node, _retry_count: u32) {}

    /// Called once when an invocation finishes with content.
    fn on_complete(&self, _outcome: Outcome, _retry_count: u32) {}

    /// Called once when an invocation is aborted.
    fn on_error(&self, _error: &WorkflowError) {}
}

impl ProgressSink for () {}

/// Drives one request through generator → reviewer with a single retry.
///
/// Holds no per-invocation state; every call to [`run`](Self::run) builds
/// and owns its own [`WorkflowState`].
pub struct ContentWorkflow<S> {
    service: S,
    options: GeneratorOptions,
}

impl<S: StructuredGenerator> ContentWorkflow<S> {
    #[cfg(test)]
    pub fn new(service: S) -> Self {
        Self::with_options(service, GeneratorOptions::default())
    }

    pub fn with_options(service: S, options: GeneratorOptions) -> Self {
        Self { service, options }
    }

    #[cfg(test)]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run one invocation, reporting each node entered to `progress`.
    pub async fn run(
        &self,
        grade: u8,
        topic: &str,
        progress: &impl ProgressSink,
    ) -> Result<InvocationReport, WorkflowError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(WorkflowError::InvalidInput("topic must not be empty".into()));
        }

        let id = Uuid::new_v4();
        let span = info_span!("invocation", %id, grade, topic);
        let result = self
            .drive(id, WorkflowState::new(grade, topic), progress)
            .instrument(span)
            .await;
        match &result {
            Ok(report) => progress.on_complete(report.outcome, report.state.retry_count),
            Err(e) => progress.on_error(e),
        }
        result
    }

    async fn drive(
        &self,
        id: Uuid,
        mut state: WorkflowState,
        progress: &impl ProgressSink,
    ) -> Result<InvocationReport, WorkflowError> {
        let started_at = Utc::now();
        let mut log = vec![entry("Agent invocation started")];
        let mut path = Vec::new();
        let mut node = Node::Generator;
        let mut passed = false;
        info!("invocation started");

        loop {
            path.push(node);
            progress.on_node(node, state.retry_count);
            match node {
                Node::Generator => {
                    let update = steps::generate(&state, &self.service, &self.options).await?;
                    state.apply_content(update);
                    log.push(entry("Generator produced content"));
                    node = Node::Reviewer;
                }
                Node::Reviewer => {
                    let update = steps::review(&state, &self.service).await?;
                    let decision =
                        StateMachine::decide(&update.reviewer_output, state.retry_count);
                    log.push(entry(format!(
                        "Reviewer returned status \"{}\"",
                        update.reviewer_output.status
                    )));
                    state.apply_review(update);

                    let transition = StateMachine::apply(&mut state, decision);
                    match transition {
                        Transition::Retry { retry_count } => {
                            info!(retry_count, "review failed, regenerating");
                            log.push(entry(format!("Retry {retry_count} requested")));
                        }
                        Transition::End { passed: p } => passed = p,
                    }
                    node = transition.target();
                }
                Node::End => break,
            }
        }

        let outcome = if passed {
            Outcome::Passed
        } else {
            info!(retry_count = state.retry_count, "content did not pass review");
            Outcome::FailedReview
        };
        info!(?outcome, retry_count = state.retry_count, "invocation completed");
        log.push(entry("Agent invocation completed"));

        let completed_at = Utc::now();
        Ok(InvocationReport {
            id,
            state,
            outcome,
            path,
            log,
            started_at,
            completed_at,
            duration_ms: (completed_at - started_at).num_milliseconds(),
        })
    }
}

fn entry(message: impl Into<String>) -> LogEntry {
    LogEntry {
        at: Utc::now(),
        message: message.into(),
    }
}
