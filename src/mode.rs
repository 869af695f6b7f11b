// Execution mode: serverless runtime vs. local one-shot, chosen from the environment.

/// Non-empty inside the Lambda runtime.
pub const EXECUTION_ENV_VAR: &str = "AWS_EXECUTION_ENV";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Register the handler with the runtime and let it drive invocations.
    Serverless { execution_env: String },
    /// Run the handler once and exit.
    OneShot,
}

impl ExecutionMode {
    pub fn from_env() -> Self {
        Self::from_marker(std::env::var(EXECUTION_ENV_VAR).ok())
    }

    pub fn from_marker(marker: Option<String>) -> Self {
        match marker {
            Some(execution_env) if !execution_env.is_empty() => {
                ExecutionMode::Serverless { execution_env }
            }
            _ => ExecutionMode::OneShot,
        }
    }
}

/// Runtime details logged at startup; no functional effect.
#[derive(Debug, Clone, Default)]
pub struct RuntimeDiagnostics {
    pub function_version: Option<String>,
    pub memory_size_mb: Option<String>,
}

impl RuntimeDiagnostics {
    pub fn from_env() -> Self {
        Self {
            function_version: std::env::var("AWS_LAMBDA_FUNCTION_VERSION").ok(),
            memory_size_mb: std::env::var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE").ok(),
        }
    }
}
