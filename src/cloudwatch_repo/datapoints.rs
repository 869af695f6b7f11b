// Convert raw CloudWatch datapoints into Samples.

use aws_sdk_cloudwatch::types::Datapoint;
use chrono::{DateTime, Utc};

use crate::models::{Sample, Statistic};

/// Keeps the backend's order. Datapoints without a timestamp, without the requested
/// statistic, or with a non-finite value are skipped.
pub fn to_samples(datapoints: &[Datapoint], statistic: Statistic) -> Vec<Sample> {
    datapoints
        .iter()
        .filter_map(|dp| {
            let sample = to_sample(dp, statistic);
            if sample.is_none() {
                tracing::debug!(?dp, statistic = statistic.as_str(), "skipping incomplete datapoint");
            }
            sample
        })
        .collect()
}

fn to_sample(dp: &Datapoint, statistic: Statistic) -> Option<Sample> {
    let ts = dp.timestamp()?;
    let timestamp = DateTime::<Utc>::from_timestamp(ts.secs(), ts.subsec_nanos())?;
    let value = match statistic {
        Statistic::Average => dp.average(),
        Statistic::Maximum => dp.maximum(),
        Statistic::Minimum => dp.minimum(),
        Statistic::Sum => dp.sum(),
        Statistic::SampleCount => dp.sample_count(),
    }
    .filter(|v| v.is_finite())?;
    Some(Sample { timestamp, value })
}
