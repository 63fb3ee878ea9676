use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::AgentError;
use crate::platform::LogSink;
use crate::samplers::Sampler;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub emitted: usize,
    pub failed: usize,
}

/// Samples every registered producer once per tick and hands the readings to
/// the log sink. Knows nothing about scheduling.
pub struct SamplingLoop {
    samplers: Vec<Box<dyn Sampler>>,
    sink: Arc<dyn LogSink>,
}

impl SamplingLoop {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            samplers: Vec::new(),
            sink,
        }
    }

    pub fn with_samplers(sink: Arc<dyn LogSink>, samplers: Vec<Box<dyn Sampler>>) -> Self {
        Self { samplers, sink }
    }

    pub fn register(&mut self, sampler: Box<dyn Sampler>) {
        debug!("Registered sampler '{}'", sampler.name());
        self.samplers.push(sampler);
    }

    pub fn sampler_names(&self) -> Vec<String> {
        self.samplers.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        Self::sample_all(&mut self.samplers, self.sink.as_ref(), now_ms)
    }

    /// Moves the samplers out so a tick can run them without holding the
    /// loop's lock. Hand them back with `restore`.
    pub fn take_samplers(&mut self) -> Vec<Box<dyn Sampler>> {
        std::mem::take(&mut self.samplers)
    }

    /// Puts taken samplers back ahead of any registered while they were out.
    pub fn restore(&mut self, mut samplers: Vec<Box<dyn Sampler>>) {
        samplers.append(&mut self.samplers);
        self.samplers = samplers;
    }

    pub fn sink(&self) -> Arc<dyn LogSink> {
        self.sink.clone()
    }

    pub fn sample_all(samplers: &mut [Box<dyn Sampler>], sink: &dyn LogSink, now_ms: u64) -> TickReport {
        let mut report = TickReport::default();

        for sampler in samplers.iter_mut() {
            match sampler.sample(now_ms) {
                Ok(sample) => {
                    sink.emit(sample);
                    report.emitted += 1;
                }
                Err(source) => {
                    let err = AgentError::SamplerFailed {
                        sampler: sampler.name().to_string(),
                        source,
                    };
                    warn!("{}", err);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
