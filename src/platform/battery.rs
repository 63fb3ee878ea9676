use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::SamplerError;

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// Point-in-time battery reading.
pub trait BatteryStatus: Send + Sync {
    /// Temperature in tenths of a degree Celsius.
    fn temperature_tenths(&self) -> Result<i32, SamplerError>;
}

/// Reads `temp` from the first `BAT*` entry under the sysfs power supply class.
#[derive(Debug, Clone)]
pub struct SysfsBattery {
    root: PathBuf,
}

impl SysfsBattery {
    pub fn new() -> Self {
        Self::with_root(POWER_SUPPLY_DIR)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsBattery {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryStatus for SysfsBattery {
    fn temperature_tenths(&self) -> Result<i32, SamplerError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| SamplerError::Unavailable(format!("{}: {}", self.root.display(), e)))?;

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with("BAT") {
                continue;
            }
            let temp_file = entry.path().join("temp");
            match fs::read_to_string(&temp_file) {
                Ok(raw) => {
                    return raw.trim().parse::<i32>().map_err(|e| {
                        SamplerError::Source(format!("{}: {:?}: {}", temp_file.display(), raw.trim(), e))
                    })
                }
                Err(e) => debug!("No temperature for {}: {}", name, e),
            }
        }
        Err(SamplerError::Unavailable("no battery reports a temperature".to_string()))
    }
}
