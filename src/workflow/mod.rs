mod machine;
mod state;

pub use machine::{Node, StateMachine, Transition};
pub use state::{ContentUpdate, ReviewUpdate, WorkflowState};
