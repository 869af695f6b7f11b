// Reduced per-metric statistics and the combined payload.
// Field names on the wire are short (perc/time/avg, max/time/total) and their order is fixed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CPU utilization over the window: highest per-period average and the mean of all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSummary {
    #[serde(rename = "perc")]
    pub peak_percent: f64,
    #[serde(rename = "time")]
    pub peak_time: DateTime<Utc>,
    #[serde(rename = "avg")]
    pub average_percent: f64,
}

/// Inbound network traffic over the window.
///
/// `total_bytes` is the sum of per-period maxima, not the bytes actually transferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetSummary {
    #[serde(rename = "max")]
    pub peak_bytes: f64,
    #[serde(rename = "time")]
    pub peak_time: DateTime<Utc>,
    #[serde(rename = "total")]
    pub total_bytes: f64,
}

/// Success body: CPU first, network second, regardless of completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub cpu: CpuSummary,
    pub net: NetSummary,
}
