// Error taxonomy: fetch, empty series, per-pipeline failure, invocation-level error

use std::time::Duration;

use thiserror::Error;

use crate::pipeline::MetricKind;

/// A metric query to the backend failed (network, auth, throttling, malformed selection).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("metric query failed: {message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A reduction was attempted over zero samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no datapoints in window")]
pub struct EmptySeriesError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    EmptySeries(#[from] EmptySeriesError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch",
            PipelineError::EmptySeries(_) => "reduce",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{metric} pipeline: {error}")]
pub struct PipelineFailure {
    pub metric: MetricKind,
    pub error: PipelineError,
}

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Region/credentials/config file could not be resolved. Raised before any fetch.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{}", describe_failures(.0))]
    Pipelines(Vec<PipelineFailure>),
    #[error("metrics not collected within {0:?}")]
    Timeout(Duration),
    #[error("serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MonitorError {
    pub fn stage(&self) -> &'static str {
        match self {
            MonitorError::Config(_) => "config",
            MonitorError::Pipelines(failures) => {
                if failures.iter().any(|f| matches!(f.error, PipelineError::Fetch(_))) {
                    "fetch"
                } else {
                    "reduce"
                }
            }
            MonitorError::Timeout(_) => "timeout",
            MonitorError::Serialization(_) => "serialize",
        }
    }

    /// Status code for the invocation envelope.
    /// Upstream fetch failures win over empty windows when both pipelines fail.
    pub fn status_code(&self) -> u16 {
        match self.stage() {
            "fetch" => 502,
            "reduce" => 503,
            "timeout" => 504,
            _ => 500,
        }
    }

    pub fn failures(&self) -> &[PipelineFailure] {
        match self {
            MonitorError::Pipelines(failures) => failures,
            _ => &[],
        }
    }
}

fn describe_failures(failures: &[PipelineFailure]) -> String {
    let parts: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
    format!("metrics collection failed: {}", parts.join("; "))
}
