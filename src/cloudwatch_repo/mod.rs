// Metric statistics via CloudWatch (aws-sdk-cloudwatch)

mod datapoints;

use async_trait::async_trait;
use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime as SmithyDateTime;
use aws_sdk_cloudwatch::types::{Dimension, StandardUnit, Statistic as SdkStatistic};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::FetchError;
use crate::models::{MetricUnit, Sample, SeriesSelection, Statistic};

pub use datapoints::to_samples;

/// Backend query seam: one selection in, an unordered series out.
/// Every backend failure surfaces as a single `FetchError` kind; no retries.
#[async_trait]
pub trait MetricClient: Send + Sync {
    async fn query(&self, selection: &SeriesSelection) -> Result<Vec<Sample>, FetchError>;
}

/// CloudWatch `GetMetricStatistics` client. The SDK client is cheap to clone and safe to share
/// between concurrent pipelines.
#[derive(Debug, Clone)]
pub struct CloudWatchRepo {
    client: Client,
}

impl CloudWatchRepo {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl MetricClient for CloudWatchRepo {
    #[instrument(skip_all, fields(metric = %selection.metric_name, statistic = selection.statistic.as_str()))]
    async fn query(&self, selection: &SeriesSelection) -> Result<Vec<Sample>, FetchError> {
        let dimension = Dimension::builder()
            .name(&selection.dimension_name)
            .value(&selection.dimension_value)
            .build();

        let output = self
            .client
            .get_metric_statistics()
            .namespace(&selection.namespace)
            .metric_name(&selection.metric_name)
            .dimensions(dimension)
            .start_time(to_smithy_time(selection.start_time))
            .end_time(to_smithy_time(selection.end_time))
            .period(selection.period_secs)
            .statistics(sdk_statistic(selection.statistic))
            .unit(sdk_unit(selection.unit))
            .send()
            .await
            .map_err(|e| FetchError::new(DisplayErrorContext(&e).to_string()))?;

        let samples = to_samples(output.datapoints(), selection.statistic);
        tracing::debug!(
            operation = "get_metric_statistics",
            datapoints = output.datapoints().len(),
            samples = samples.len(),
            "CloudWatch query complete"
        );
        Ok(samples)
    }
}

fn to_smithy_time(t: DateTime<Utc>) -> SmithyDateTime {
    SmithyDateTime::from_secs_and_nanos(t.timestamp(), t.timestamp_subsec_nanos())
}

fn sdk_statistic(statistic: Statistic) -> SdkStatistic {
    match statistic {
        Statistic::Average => SdkStatistic::Average,
        Statistic::Maximum => SdkStatistic::Maximum,
        Statistic::Minimum => SdkStatistic::Minimum,
        Statistic::Sum => SdkStatistic::Sum,
        Statistic::SampleCount => SdkStatistic::SampleCount,
    }
}

fn sdk_unit(unit: MetricUnit) -> StandardUnit {
    match unit {
        MetricUnit::Percent => StandardUnit::Percent,
        MetricUnit::Bytes => StandardUnit::Bytes,
    }
}
