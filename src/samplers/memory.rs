use sysinfo::System;

use super::Sampler;
use crate::error::SamplerError;
use crate::kernel::event::{MetricValue, Sample};

pub const MEMORY_USED: &str = "memory_used_percent";

pub struct MemoryUsageSampler {
    system: System,
}

impl MemoryUsageSampler {
    pub fn new() -> Self {
        Self { system: System::new() }
    }
}

impl Default for MemoryUsageSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for MemoryUsageSampler {
    fn name(&self) -> &str {
        MEMORY_USED
    }

    fn sample(&mut self, now_ms: u64) -> Result<Sample, SamplerError> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(SamplerError::Unavailable("total memory reported as zero".to_string()));
        }
        let used = self.system.used_memory() as f64 / total as f64 * 100.0;
        Ok(Sample::new(MEMORY_USED, MetricValue::Number(used), now_ms))
    }
}
