use std::sync::Arc;

use super::Sampler;
use crate::error::SamplerError;
use crate::kernel::event::{MetricValue, Sample};
use crate::kernel::time::FOREGROUND_WINDOW_MS;
use crate::platform::UsageEventLog;

pub const FOREGROUND_APP: &str = "foreground_app";

/// Reports the app most recently brought to the foreground within a trailing
/// window of the usage-event log.
pub struct ForegroundAppSampler {
    log: Arc<dyn UsageEventLog>,
    window_ms: u64,
}

impl ForegroundAppSampler {
    pub fn new(log: Arc<dyn UsageEventLog>) -> Self {
        Self::with_window(log, FOREGROUND_WINDOW_MS)
    }

    pub fn with_window(log: Arc<dyn UsageEventLog>, window_ms: u64) -> Self {
        Self { log, window_ms }
    }
}

impl Sampler for ForegroundAppSampler {
    fn name(&self) -> &str {
        FOREGROUND_APP
    }

    fn sample(&mut self, now_ms: u64) -> Result<Sample, SamplerError> {
        let from = now_ms.saturating_sub(self.window_ms);

        // Last qualifying event wins.
        let value = self
            .log
            .query_events(from, now_ms)
            .filter(|e| e.kind.brings_to_foreground())
            .last()
            .map(|e| MetricValue::Text(e.app_id))
            .unwrap_or(MetricValue::Missing);

        Ok(Sample::new(FOREGROUND_APP, value, now_ms))
    }
}
