use serde::Serialize;
use serde::de::DeserializeOwned;

/// A type the structured-generation service can be asked to produce.
///
/// `json_schema` is the descriptor shown to the model; deserialization
/// through serde is what actually enforces the shape.
pub trait Schema: Serialize + DeserializeOwned {
    /// Short name used in prompts, logs and error messages.
    const NAME: &'static str;

    fn json_schema() -> serde_json::Value;
}
