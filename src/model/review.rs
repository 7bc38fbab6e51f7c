use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pass,
    Fail,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Pass => write!(f, "pass"),
            ReviewStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Reviewer verdict on a piece of [`Content`](super::Content).
///
/// `feedback` only carries meaning when `status` is [`ReviewStatus::Fail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub status: ReviewStatus,
    pub feedback: Vec<String>,
}

impl Review {
    pub fn passed(&self) -> bool {
        self.status == ReviewStatus::Pass
    }
}

impl Schema for Review {
    const NAME: &'static str = "Review";

    fn json_schema() -> serde_json::Value {
        json!({
            "title": "Review",
            "type": "object",
            "properties": {
                "status": { "type": "string", "enum": ["pass", "fail"] },
                "feedback": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["status", "feedback"]
        })
    }
}
