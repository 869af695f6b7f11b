// Runs the CPU and network pipelines under an explicit strategy and joins their summaries.
// Sequential: one backend call after the other. Concurrent: two spawned tasks, both awaited.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Duration, Instant};

use crate::cloudwatch_repo::MetricClient;
use crate::config::OrchestratorConfig;
use crate::error::{FetchError, MonitorError, PipelineError, PipelineFailure};
use crate::models::{CpuSummary, NetSummary, ResponsePayload, SeriesSelection};
use crate::pipeline::{self, MetricKind, Target};

/// How the two pipelines are scheduled. Chosen in config, never auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Lower peak memory; latency is the sum of both backend calls.
    Sequential,
    /// Both backend calls in flight at once; latency is the slower of the two.
    Concurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub strategy: Strategy,
    pub deadline: Option<Duration>,
}

impl RunOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self {
            strategy: config.strategy,
            deadline: config.deadline_ms.map(Duration::from_millis),
        }
    }
}

/// Joined payload plus wall-clock time from launch to join (diagnostics only).
#[derive(Debug, Clone)]
pub struct RunReport {
    pub payload: ResponsePayload,
    pub elapsed: Duration,
}

#[tracing::instrument(
    skip_all,
    fields(strategy = ?options.strategy, resource_group = %target.resource_group)
)]
pub async fn run(
    client: Arc<dyn MetricClient>,
    target: &Target,
    options: &RunOptions,
) -> Result<RunReport, MonitorError> {
    let end_time = chrono::Utc::now();
    let cpu_selection = target.selection(MetricKind::Cpu, end_time);
    let net_selection = target.selection(MetricKind::Net, end_time);

    let start = Instant::now();
    let result = match options.strategy {
        Strategy::Sequential => {
            within(options.deadline, async {
                let cpu = pipeline::fetch_and_reduce_cpu(client.as_ref(), &cpu_selection)
                    .await
                    .map_err(|error| single_failure(MetricKind::Cpu, error))?;
                let net = pipeline::fetch_and_reduce_net(client.as_ref(), &net_selection)
                    .await
                    .map_err(|error| single_failure(MetricKind::Net, error))?;
                Ok::<_, MonitorError>(ResponsePayload { cpu, net })
            })
            .await
        }
        Strategy::Concurrent => {
            run_concurrent(client, cpu_selection, net_selection, options.deadline).await
        }
    };
    let elapsed = start.elapsed();

    match result {
        Ok(payload) => {
            tracing::info!(
                strategy = ?options.strategy,
                elapsed_ms = elapsed.as_millis() as u64,
                "== Took {:.2} secs ==",
                elapsed.as_secs_f64()
            );
            Ok(RunReport { payload, elapsed })
        }
        Err(e) => {
            tracing::warn!(
                strategy = ?options.strategy,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "metrics collection failed"
            );
            Err(e)
        }
    }
}

async fn run_concurrent(
    client: Arc<dyn MetricClient>,
    cpu_selection: SeriesSelection,
    net_selection: SeriesSelection,
    deadline: Option<Duration>,
) -> Result<ResponsePayload, MonitorError> {
    let cpu_client = client.clone();
    let mut cpu_task: JoinHandle<Result<CpuSummary, PipelineError>> = tokio::spawn(async move {
        pipeline::fetch_and_reduce_cpu(cpu_client.as_ref(), &cpu_selection).await
    });
    let net_client = client;
    let mut net_task: JoinHandle<Result<NetSummary, PipelineError>> = tokio::spawn(async move {
        pipeline::fetch_and_reduce_net(net_client.as_ref(), &net_selection).await
    });

    // Both handles are awaited even when one fails first; there is nothing shared to cancel.
    let joined = within(deadline, async {
        Ok::<_, MonitorError>(tokio::join!(&mut cpu_task, &mut net_task))
    })
    .await;
    let (cpu, net) = match joined {
        Ok(results) => results,
        Err(e) => {
            cpu_task.abort();
            net_task.abort();
            return Err(e);
        }
    };

    let cpu = cpu.unwrap_or_else(|e| Err(task_failure(e)));
    let net = net.unwrap_or_else(|e| Err(task_failure(e)));
    join_summaries(cpu, net)
}

/// A pipeline task that panicked never produced a series; report it as a failed fetch.
fn task_failure(e: JoinError) -> PipelineError {
    PipelineError::Fetch(FetchError::new(format!("pipeline task failed: {}", e)))
}

/// CPU before network in the payload, whichever finished first.
pub fn join_summaries(
    cpu: Result<CpuSummary, PipelineError>,
    net: Result<NetSummary, PipelineError>,
) -> Result<ResponsePayload, MonitorError> {
    match (cpu, net) {
        (Ok(cpu), Ok(net)) => Ok(ResponsePayload { cpu, net }),
        (cpu, net) => {
            let mut failures = Vec::with_capacity(2);
            if let Err(error) = cpu {
                failures.push(PipelineFailure {
                    metric: MetricKind::Cpu,
                    error,
                });
            }
            if let Err(error) = net {
                failures.push(PipelineFailure {
                    metric: MetricKind::Net,
                    error,
                });
            }
            Err(MonitorError::Pipelines(failures))
        }
    }
}

fn single_failure(metric: MetricKind, error: PipelineError) -> MonitorError {
    MonitorError::Pipelines(vec![PipelineFailure { metric, error }])
}

async fn within<T, F>(deadline: Option<Duration>, fut: F) -> Result<T, MonitorError>
where
    F: std::future::Future<Output = Result<T, MonitorError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| MonitorError::Timeout(d))?,
        None => fut.await,
    }
}
