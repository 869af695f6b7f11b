// Series reduction: peak (first occurrence wins on ties) plus mean or total.
// Pure functions; no I/O. Values are expected finite; the CloudWatch adapter drops NaN/inf.

use crate::error::EmptySeriesError;
use crate::models::{CpuSummary, NetSummary, Sample};

/// Peak sample and running sum over a non-empty series.
/// A later sample replaces the peak only when strictly greater, so ties keep the earliest in input order.
fn scan(samples: &[Sample]) -> Result<(Sample, f64), EmptySeriesError> {
    let (first, rest) = samples.split_first().ok_or(EmptySeriesError)?;
    let mut peak = *first;
    let mut sum = first.value;
    for s in rest {
        sum += s.value;
        if s.value > peak.value {
            peak = *s;
        }
    }
    Ok((peak, sum))
}

/// Reduces per-period CPU averages to peak + arithmetic mean.
pub fn reduce_cpu(samples: &[Sample]) -> Result<CpuSummary, EmptySeriesError> {
    let (peak, sum) = scan(samples)?;
    Ok(CpuSummary {
        peak_percent: peak.value,
        peak_time: peak.timestamp,
        average_percent: sum / samples.len() as f64,
    })
}

/// Reduces per-period network maxima to peak + sum of those maxima.
pub fn reduce_net(samples: &[Sample]) -> Result<NetSummary, EmptySeriesError> {
    let (peak, sum) = scan(samples)?;
    Ok(NetSummary {
        peak_bytes: peak.value,
        peak_time: peak.timestamp,
        total_bytes: sum,
    })
}
