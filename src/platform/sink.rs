use tracing::info;

use crate::kernel::event::Sample;

/// Destination for samples. Fire-and-forget; must not block the loop.
pub trait LogSink: Send + Sync {
    fn emit(&self, sample: Sample);
}

/// Emits each sample as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, sample: Sample) {
        info!(
            target: "perfwatch::sample",
            metric = %sample.metric,
            value = %sample.value,
            timestamp_ms = sample.timestamp_ms,
            "sample"
        );
    }
}
