use serde::{Deserialize, Serialize};
use serde_json::json;

use super::schema::Schema;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    /// Display order is the order the model produced.
    pub options: Vec<String>,
    pub answer: String,
}

impl Mcq {
    /// Whether `answer` matches one of `options` exactly.
    pub fn answer_in_options(&self) -> bool {
        self.options.iter().any(|o| o == &self.answer)
    }
}

/// Generated lesson material: an explanation followed by its quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub explanation: String,
    pub mcqs: Vec<Mcq>,
}

impl Content {
    /// Checks every MCQ has at least one option and an answer drawn from them.
    ///
    /// Returns one message per offending question, numbered from 1 the way
    /// questions are displayed.
    pub fn answer_violations(&self) -> Vec<String> {
        self.mcqs
            .iter()
            .enumerate()
            .filter_map(|(i, mcq)| {
                let n = i + 1;
                if mcq.options.is_empty() {
                    Some(format!("MCQ {n} has no options"))
                } else if !mcq.answer_in_options() {
                    Some(format!(
                        "MCQ {n} answer {:?} is not one of its options",
                        mcq.answer
                    ))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Schema for Content {
    const NAME: &'static str = "Content";

    fn json_schema() -> serde_json::Value {
        json!({
            "title": "Content",
            "type": "object",
            "properties": {
                "explanation": { "type": "string" },
                "mcqs": {
                    "type": "array",
                    "items": {
                        "title": "MCQ",
                        "type": "object",
                        "properties": {
                            "question": { "type": "string" },
                            "options": { "type": "array", "items": { "type": "string" } },
                            "answer": { "type": "string" }
                        },
                        "required": ["question", "options", "answer"]
                    }
                }
            },
            "required": ["explanation", "mcqs"]
        })
    }
}
