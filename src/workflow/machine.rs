use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::WorkflowState;
use crate::model::{Review, ReviewStatus};

/// Regenerations allowed after a failed review.
pub const MAX_RETRIES: u32 = 1;

/// Nodes of the content workflow.
///
/// Every invocation flows through: GENERATOR → REVIEWER → (GENERATOR → REVIEWER) → END
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Generator,
    Reviewer,
    End,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Generator => write!(f, "GENERATOR"),
            Node::Reviewer => write!(f, "REVIEWER"),
            Node::End => write!(f, "END"),
        }
    }
}

/// Branch chosen after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retry,
    End,
}

/// The edge actually taken once a decision has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Back to the generator; carries the retry count after the increment.
    Retry { retry_count: u32 },
    /// Terminal; `passed` mirrors the last review's status.
    End { passed: bool },
}

impl Transition {
    pub fn target(&self) -> Node {
        match self {
            Transition::Retry { .. } => Node::Generator,
            Transition::End { .. } => Node::End,
        }
    }
}

/// Routing rules for the reviewer's outgoing edge.
pub struct StateMachine;

impl StateMachine {
    /// Pure branch predicate.
    ///
    /// - `pass` ends the run.
    /// - `fail` with retries left asks for a regeneration.
    /// - `fail` with retries exhausted ends the run with the failing content.
    pub fn decide(review: &Review, retry_count: u32) -> Decision {
        match review.status {
            ReviewStatus::Pass => Decision::End,
            ReviewStatus::Fail if retry_count < MAX_RETRIES => Decision::Retry,
            ReviewStatus::Fail => Decision::End,
        }
    }

    /// Applies a decision to the state. The retry counter is bumped here and
    /// only here, once per reviewer → generator edge.
    pub fn apply(state: &mut WorkflowState, decision: Decision) -> Transition {
        match decision {
            Decision::Retry => {
                state.retry_count += 1;
                Transition::Retry {
                    retry_count: state.retry_count,
                }
            }
            Decision::End => Transition::End {
                passed: state.passed_review(),
            },
        }
    }
}
