//! Structured generation: instructions in, schema-conforming values out.
//!
//! [`StructuredGenerator`] is the capability the workflow steps receive.
//! [`AnthropicGenerator`] implements it over any [`MessageSender`] by
//! appending the target schema to the system instruction and parsing the
//! model's reply as JSON.

use tracing::debug;

use crate::anthropic::{Message, MessageSender, MessagesRequest};
use crate::error::ServiceError;
use crate::model::Schema;

pub trait StructuredGenerator {
    /// Ask for a value of type `T` given a system instruction and a user message.
    async fn generate<T: Schema>(&self, system: &str, user: &str) -> Result<T, ServiceError>;
}

/// Sampling settings sent with every request.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

pub struct AnthropicGenerator<C> {
    client: C,
    settings: ModelSettings,
}

impl<C: MessageSender> AnthropicGenerator<C> {
    pub fn new(client: C, settings: ModelSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }
}

impl<C: MessageSender> StructuredGenerator for AnthropicGenerator<C> {
    async fn generate<T: Schema>(&self, system: &str, user: &str) -> Result<T, ServiceError> {
        let req = MessagesRequest {
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            system: Some(schema_instruction::<T>(system)),
            temperature: self.settings.temperature,
            messages: vec![Message::user(user)],
        };

        let response = self.client.send_message(&req).await?;
        debug!(
            schema = T::NAME,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "structured response received"
        );

        if response.is_truncated() {
            return Err(ServiceError::Truncated);
        }
        let text = response.text();
        let json = strip_code_fence(&text);
        if json.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }

        serde_json::from_str::<T>(json).map_err(|e| ServiceError::Malformed {
            schema: T::NAME,
            reason: e.to_string(),
        })
    }
}

/// Appends the output contract for `T` to a task instruction.
fn schema_instruction<T: Schema>(system: &str) -> String {
    let schema = serde_json::to_string_pretty(&T::json_schema()).unwrap_or_default();
    format!(
        "{}\n\nRespond with ONLY a single JSON object, no other text, \
         conforming to this {} schema:\n{schema}",
        system.trim_end(),
        T::NAME
    )
}

/// Removes a surrounding Markdown code fence (```json ... ```), if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
pub mod mock {
    //! Scripted [`StructuredGenerator`] for workflow tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// One recorded call to the scripted service.
    #[derive(Debug, Clone)]
    pub struct Call {
        pub schema: &'static str,
        pub system: String,
        pub user: String,
    }

    /// Replays queued JSON values (or failures) in order and records every call.
    #[derive(Default)]
    pub struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<serde_json::Value, String>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, value: serde_json::Value) -> Self {
            self.responses.lock().unwrap().push_back(Ok(value));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(message.to_string()));
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_for(&self, schema: &str) -> usize {
            self.calls().iter().filter(|c| c.schema == schema).count()
        }
    }

    impl StructuredGenerator for ScriptedGenerator {
        async fn generate<T: Schema>(&self, system: &str, user: &str) -> Result<T, ServiceError> {
            self.calls.lock().unwrap().push(Call {
                schema: T::NAME,
                system: system.to_string(),
                user: user.to_string(),
            });
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(value)) => {
                    serde_json::from_value(value).map_err(|e| ServiceError::Malformed {
                        schema: T::NAME,
                        reason: e.to_string(),
                    })
                }
                Some(Err(message)) => Err(ServiceError::Api(
                    crate::anthropic::AnthropicError::ApiError {
                        status: 500,
                        message,
                    },
                )),
                None => Err(ServiceError::EmptyResponse),
            }
        }
    }
}
