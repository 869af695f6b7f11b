// Pipeline tests: fixed selections, fetch-then-reduce, error propagation

mod common;

use asg_metrics::config::AppConfig;
use asg_metrics::error::{EmptySeriesError, PipelineError};
use asg_metrics::models::{MetricUnit, Statistic};
use asg_metrics::pipeline::{MetricKind, Target, fetch_and_reduce_cpu, fetch_and_reduce_net};
use common::{CPU_METRIC, FakeClient, NET_METRIC, t};

#[test]
fn cpu_selection_is_average_percent_over_three_days() {
    let end = t(1000);
    let sel = Target::default().selection(MetricKind::Cpu, end);
    assert_eq!(sel.namespace, "AWS/EC2");
    assert_eq!(sel.metric_name, "CPUUtilization");
    assert_eq!(sel.dimension_name, "AutoScalingGroupName");
    assert_eq!(sel.dimension_value, "managers-ag");
    assert_eq!(sel.end_time, end);
    assert_eq!(sel.end_time - sel.start_time, chrono::Duration::days(3));
    assert_eq!(sel.period_secs, 300);
    assert_eq!(sel.statistic, Statistic::Average);
    assert_eq!(sel.unit, MetricUnit::Percent);
}

#[test]
fn net_selection_is_maximum_bytes() {
    let sel = Target::default().selection(MetricKind::Net, t(10));
    assert_eq!(sel.metric_name, "NetworkIn");
    assert_eq!(sel.statistic, Statistic::Maximum);
    assert_eq!(sel.unit, MetricUnit::Bytes);
}

#[test]
fn target_from_config_uses_configured_group_and_window() {
    let config = AppConfig::load_from_str(
        r#"
[aws]
region = "us-east-1"

[target]
resource_group = "workers-ag"
window_hours = 24
period_secs = 60

[orchestrator]
strategy = "concurrent"
"#,
    )
    .unwrap();
    let target = Target::from_config(&config.target);
    let sel = target.selection(MetricKind::Cpu, t(500));
    assert_eq!(sel.dimension_value, "workers-ag");
    assert_eq!(sel.end_time - sel.start_time, chrono::Duration::hours(24));
    assert_eq!(sel.period_secs, 60);
}

#[tokio::test]
async fn fetch_and_reduce_cpu_queries_once_and_reduces() {
    let client = FakeClient::healthy();
    let sel = Target::default().selection(MetricKind::Cpu, t(100));
    let out = fetch_and_reduce_cpu(&client, &sel).await.unwrap();
    assert_eq!(out.peak_percent, 50.0);
    assert_eq!(out.average_percent, 30.0);
    assert_eq!(client.calls(), 1);
    assert_eq!(client.seen()[0], sel);
}

#[tokio::test]
async fn fetch_and_reduce_net_queries_once_and_reduces() {
    let client = FakeClient::healthy();
    let sel = Target::default().selection(MetricKind::Net, t(100));
    let out = fetch_and_reduce_net(&client, &sel).await.unwrap();
    assert_eq!(out.peak_bytes, 2048.0);
    assert_eq!(out.total_bytes, 3072.0);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn fetch_error_propagates_without_retry() {
    let client = FakeClient::new().with_failure(CPU_METRIC, "AccessDenied");
    let sel = Target::default().selection(MetricKind::Cpu, t(100));
    let err = fetch_and_reduce_cpu(&client, &sel).await.unwrap_err();
    match err {
        PipelineError::Fetch(e) => assert_eq!(e.message, "AccessDenied"),
        other => panic!("expected fetch error, got {:?}", other),
    }
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn empty_window_is_empty_series_error() {
    let client = FakeClient::new().with_series(NET_METRIC, vec![]);
    let sel = Target::default().selection(MetricKind::Net, t(100));
    let err = fetch_and_reduce_net(&client, &sel).await.unwrap_err();
    assert_eq!(err, PipelineError::EmptySeries(EmptySeriesError));
    assert_eq!(err.stage(), "reduce");
}
