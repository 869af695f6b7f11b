// Domain models: raw samples, per-metric summaries, invocation envelope

mod response;
mod sample;
mod summary;

pub use response::{ErrorBody, ErrorDetail, FailureDetail, InvocationResponse};
pub use sample::{MetricUnit, Sample, SeriesSelection, Statistic};
pub use summary::{CpuSummary, NetSummary, ResponsePayload};
