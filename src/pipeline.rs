// Fetch-then-reduce for one metric. Each run owns its selection and samples.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cloudwatch_repo::MetricClient;
use crate::config::TargetConfig;
use crate::error::PipelineError;
use crate::models::{CpuSummary, MetricUnit, NetSummary, SeriesSelection, Statistic};
use crate::reducer;

/// Wall-clock format for the human-readable summary lines.
const LOG_TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Net,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Net => "net",
        }
    }

    pub fn metric_name(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "CPUUtilization",
            MetricKind::Net => "NetworkIn",
        }
    }

    pub fn statistic(&self) -> Statistic {
        match self {
            MetricKind::Cpu => Statistic::Average,
            MetricKind::Net => Statistic::Maximum,
        }
    }

    pub fn unit(&self) -> MetricUnit {
        match self {
            MetricKind::Cpu => MetricUnit::Percent,
            MetricKind::Net => MetricUnit::Bytes,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource group every selection is dimensioned to, plus window and period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub namespace: String,
    pub dimension_name: String,
    pub resource_group: String,
    pub window: Duration,
    pub period_secs: i32,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            namespace: "AWS/EC2".into(),
            dimension_name: "AutoScalingGroupName".into(),
            resource_group: "managers-ag".into(),
            window: Duration::days(3),
            period_secs: 300,
        }
    }
}

impl Target {
    pub fn from_config(config: &TargetConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            dimension_name: config.dimension_name.clone(),
            resource_group: config.resource_group.clone(),
            window: Duration::hours(i64::from(config.window_hours)),
            period_secs: config.period_secs,
        }
    }

    /// Selection for `kind` over the trailing window ending at `end_time`.
    pub fn selection(&self, kind: MetricKind, end_time: DateTime<Utc>) -> SeriesSelection {
        SeriesSelection {
            namespace: self.namespace.clone(),
            metric_name: kind.metric_name().into(),
            dimension_name: self.dimension_name.clone(),
            dimension_value: self.resource_group.clone(),
            start_time: end_time - self.window,
            end_time,
            period_secs: self.period_secs,
            statistic: kind.statistic(),
            unit: kind.unit(),
        }
    }
}

pub async fn fetch_and_reduce_cpu(
    client: &dyn MetricClient,
    selection: &SeriesSelection,
) -> Result<CpuSummary, PipelineError> {
    let samples = client.query(selection).await?;
    let summary = reducer::reduce_cpu(&samples)?;
    tracing::info!(
        metric = %MetricKind::Cpu,
        resource_group = %selection.dimension_value,
        samples = samples.len(),
        peak_percent = summary.peak_percent,
        average_percent = summary.average_percent,
        "{} CPU peak: {:.0}% at {}, {} avg: {:.0}%",
        selection.dimension_value,
        summary.peak_percent,
        summary.peak_time.format(LOG_TIME_FORMAT),
        window_label(selection),
        summary.average_percent
    );
    Ok(summary)
}

pub async fn fetch_and_reduce_net(
    client: &dyn MetricClient,
    selection: &SeriesSelection,
) -> Result<NetSummary, PipelineError> {
    let samples = client.query(selection).await?;
    let summary = reducer::reduce_net(&samples)?;
    tracing::info!(
        metric = %MetricKind::Net,
        resource_group = %selection.dimension_value,
        samples = samples.len(),
        peak_bytes = summary.peak_bytes,
        total_bytes = summary.total_bytes,
        "{} NET peak: {:.0} KB at {}, {} total: {:.0} MB",
        selection.dimension_value,
        summary.peak_bytes / 1024.0,
        summary.peak_time.format(LOG_TIME_FORMAT),
        window_label(selection),
        summary.total_bytes / 1024.0 / 1024.0
    );
    Ok(summary)
}

/// "3 days" / "12 hours" for the summary lines.
fn window_label(selection: &SeriesSelection) -> String {
    let hours = (selection.end_time - selection.start_time).num_hours();
    if hours > 0 && hours % 24 == 0 {
        format!("{} days", hours / 24)
    } else {
        format!("{} hours", hours)
    }
}
