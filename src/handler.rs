// Invocation entry point: resolve backend config, run the orchestrator, wrap the result
// in the {body, statusCode} envelope.

use std::sync::Arc;

use async_trait::async_trait;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_cloudwatch::config::Region;

use crate::cloudwatch_repo::{CloudWatchRepo, MetricClient};
use crate::config::{AppConfig, AwsConfig};
use crate::error::MonitorError;
use crate::models::{ErrorBody, ErrorDetail, FailureDetail, InvocationResponse, ResponsePayload};
use crate::orchestrator::{self, RunOptions};
use crate::pipeline::Target;

/// Builds a fresh `MetricClient` per invocation. Failing here is a ConfigError.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn connect(&self, aws: &AwsConfig) -> Result<Arc<dyn MetricClient>, MonitorError>;
}

/// Default credential chain, pinned to the configured region.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsClientFactory;

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn connect(&self, aws: &AwsConfig) -> Result<Arc<dyn MetricClient>, MonitorError> {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(aws.region.clone()));
        if let Some(endpoint_url) = &aws.endpoint_url {
            config_loader = config_loader.endpoint_url(endpoint_url);
        }
        let config = config_loader.load().await;

        // Resolve credentials now so a missing/expired identity fails before any query.
        let provider = config
            .credentials_provider()
            .ok_or_else(|| MonitorError::Config("no AWS credentials provider configured".into()))?;
        provider
            .provide_credentials()
            .await
            .map_err(|e| MonitorError::Config(format!("unable to load AWS credentials, {}", e)))?;

        tracing::debug!(region = %aws.region, "CloudWatch client initialized");
        Ok(Arc::new(CloudWatchRepo::new(&config)))
    }
}

/// One invocation. `Err` only for ConfigError (config file or credentials); every core
/// failure becomes a non-200 envelope. Config is loaded here so a bad file fails the
/// invocation rather than runtime init.
pub async fn handle<L>(
    load_config: L,
    factory: &dyn ClientFactory,
) -> Result<InvocationResponse, MonitorError>
where
    L: FnOnce() -> anyhow::Result<AppConfig>,
{
    let config = load_config().map_err(|e| MonitorError::Config(format!("{:#}", e)))?;
    let client = factory.connect(&config.aws).await?;
    let target = Target::from_config(&config.target);
    let options = RunOptions::from_config(&config.orchestrator);

    let response = match orchestrator::run(client, &target, &options).await {
        Ok(report) => success_response(&report.payload),
        Err(e) => error_response(&e),
    };
    Ok(response)
}

pub fn success_response(payload: &ResponsePayload) -> InvocationResponse {
    match serde_json::to_string(payload) {
        Ok(body) => InvocationResponse::ok(body),
        Err(e) => error_response(&MonitorError::Serialization(e)),
    }
}

pub fn error_response(err: &MonitorError) -> InvocationResponse {
    let body = ErrorBody {
        error: ErrorDetail {
            stage: err.stage().into(),
            message: err.to_string(),
            failures: err
                .failures()
                .iter()
                .map(|f| FailureDetail {
                    metric: f.metric.as_str().into(),
                    stage: f.error.stage().into(),
                    message: f.error.to_string(),
                })
                .collect(),
        },
    };
    let body = serde_json::to_string(&body).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "error body serialization failed");
        err.to_string()
    });
    InvocationResponse {
        body,
        status_code: err.status_code(),
    }
}
