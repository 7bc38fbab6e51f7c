pub mod client;
pub mod error;
pub mod types;

pub use client::{API_URL, AnthropicClient, MessageSender};
pub use error::AnthropicError;
pub use types::{Message, MessagesRequest};
