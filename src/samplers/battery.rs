use std::sync::Arc;

use super::Sampler;
use crate::error::SamplerError;
use crate::kernel::event::{MetricValue, Sample};
use crate::platform::BatteryStatus;

pub const BATTERY_TEMPERATURE: &str = "battery_temperature_c";

pub struct BatteryTemperatureSampler {
    battery: Arc<dyn BatteryStatus>,
}

impl BatteryTemperatureSampler {
    pub fn new(battery: Arc<dyn BatteryStatus>) -> Self {
        Self { battery }
    }
}

impl Sampler for BatteryTemperatureSampler {
    fn name(&self) -> &str {
        BATTERY_TEMPERATURE
    }

    fn sample(&mut self, now_ms: u64) -> Result<Sample, SamplerError> {
        let tenths = self.battery.temperature_tenths()?;

        Ok(Sample::new(
            BATTERY_TEMPERATURE,
            MetricValue::Number(f64::from(tenths) / 10.0),
            now_ms,
        ))
    }
}
