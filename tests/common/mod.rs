// Shared test helpers: fake backends and fixed sample series

#![allow(dead_code)]

use asg_metrics::cloudwatch_repo::MetricClient;
use asg_metrics::config::{AppConfig, AwsConfig};
use asg_metrics::error::{FetchError, MonitorError};
use asg_metrics::handler::ClientFactory;
use asg_metrics::models::{Sample, SeriesSelection};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CPU_METRIC: &str = "CPUUtilization";
pub const NET_METRIC: &str = "NetworkIn";

/// t(n) = 2024-01-01T00:00:00Z + n * 5 minutes.
pub fn t(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(5 * n)
}

pub fn series(points: &[(i64, f64)]) -> Vec<Sample> {
    points.iter().map(|(n, v)| Sample::new(t(*n), *v)).collect()
}

pub fn cpu_series() -> Vec<Sample> {
    series(&[(0, 10.0), (1, 50.0), (2, 30.0)])
}

pub fn net_series() -> Vec<Sample> {
    series(&[(0, 1024.0), (1, 2048.0)])
}

/// Backend fake keyed by metric name: fixed series or failure, optional delay, call counters.
#[derive(Default)]
pub struct FakeClient {
    responses: HashMap<String, Result<Vec<Sample>, FetchError>>,
    delays: HashMap<String, Duration>,
    panics: Vec<String>,
    calls: AtomicUsize,
    completed: AtomicUsize,
    seen: Mutex<Vec<SeriesSelection>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// CPU and network series from the end-to-end example.
    pub fn healthy() -> Self {
        Self::new()
            .with_series(CPU_METRIC, cpu_series())
            .with_series(NET_METRIC, net_series())
    }

    pub fn with_series(mut self, metric: &str, samples: Vec<Sample>) -> Self {
        self.responses.insert(metric.into(), Ok(samples));
        self
    }

    pub fn with_failure(mut self, metric: &str, message: &str) -> Self {
        self.responses
            .insert(metric.into(), Err(FetchError::new(message)));
        self
    }

    /// Queries for `metric` panic instead of returning.
    pub fn with_panic(mut self, metric: &str) -> Self {
        self.panics.push(metric.into());
        self
    }

    pub fn with_delay(mut self, metric: &str, delay: Duration) -> Self {
        self.delays.insert(metric.into(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeriesSelection> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricClient for FakeClient {
    async fn query(&self, selection: &SeriesSelection) -> Result<Vec<Sample>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(selection.clone());
        if let Some(delay) = self.delays.get(&selection.metric_name) {
            tokio::time::sleep(*delay).await;
        }
        if self.panics.contains(&selection.metric_name) {
            panic!("backend client panicked on {}", selection.metric_name);
        }
        let result = self
            .responses
            .get(&selection.metric_name)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()));
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// Hands out a shared FakeClient, or fails like an unresolvable credential chain.
pub struct FakeFactory {
    pub client: Arc<FakeClient>,
    pub fail_with: Option<String>,
}

impl FakeFactory {
    pub fn ok(client: Arc<FakeClient>) -> Self {
        Self {
            client,
            fail_with: None,
        }
    }

    pub fn failing(client: Arc<FakeClient>, message: &str) -> Self {
        Self {
            client,
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl ClientFactory for FakeFactory {
    async fn connect(&self, _aws: &AwsConfig) -> Result<Arc<dyn MetricClient>, MonitorError> {
        if let Some(message) = &self.fail_with {
            return Err(MonitorError::Config(message.clone()));
        }
        Ok(self.client.clone() as Arc<dyn MetricClient>)
    }
}

pub fn app_config(strategy: &str) -> AppConfig {
    AppConfig::load_from_str(&format!(
        r#"
[aws]
region = "eu-west-2"

[target]
resource_group = "managers-ag"

[orchestrator]
strategy = "{}"
"#,
        strategy
    ))
    .unwrap()
}
