// Invocation envelope returned to the serverless runtime (or printed in one-shot mode)

use serde::{Deserialize, Serialize};

/// `body` holds the serialized payload (or error body) as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub body: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl InvocationResponse {
    pub fn ok(body: String) -> Self {
        Self {
            body,
            status_code: 200,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Non-200 body: which stage failed and, for pipeline failures, which metric(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub stage: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub metric: String,
    pub stage: String,
    pub message: String,
}
