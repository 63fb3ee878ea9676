//! Metric producers polled once per tick.

pub mod battery;
pub mod foreground;
pub mod memory;

pub use battery::BatteryTemperatureSampler;
pub use foreground::ForegroundAppSampler;
pub use memory::MemoryUsageSampler;

use crate::error::SamplerError;
use crate::kernel::event::Sample;

/// Independent unit producing one reading per tick.
/// A failing sampler never affects the others.
pub trait Sampler: Send {
    fn name(&self) -> &str;
    fn sample(&mut self, now_ms: u64) -> Result<Sample, SamplerError>;
}
