//! The two workflow nodes. Each reads the state and returns a partial update.

pub mod generator;
pub mod reviewer;

pub use generator::{FeedbackPolicy, GeneratorOptions, generate};
pub use reviewer::review;
