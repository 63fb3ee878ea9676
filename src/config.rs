use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::kernel::time::{FOREGROUND_WINDOW_MS, SAMPLE_INTERVAL_MS};

pub const CONFIG_ENV: &str = "PERFWATCH_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub sampling: SamplingConfig,
    pub keep_alive: NotificationContent,
    pub overlay: OverlayLayout,
    pub permissions: PermissionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub interval_ms: u64,
    /// Trailing window searched for the most recent foreground event.
    pub foreground_window_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: SAMPLE_INTERVAL_MS,
            foreground_window_ms: FOREGROUND_WINDOW_MS,
        }
    }
}

/// Display payload handed to the keep-alive host. Opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationContent {
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl Default for NotificationContent {
    fn default() -> Self {
        Self {
            channel_id: "PerformanceMonitorChannel".to_string(),
            title: "Performance Monitor Active".to_string(),
            body: "Monitoring performance data...".to_string(),
            icon: "ic_dialog_info".to_string(),
        }
    }
}

/// Window content and layout parameters for the overlay.
/// `None` width/height means wrap-content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayLayout {
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background_argb: u32,
    pub text_argb: u32,
    pub padding: u32,
    pub focusable: bool,
    pub touch_modal: bool,
    pub translucent: bool,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self {
            label: "Overlay Active".to_string(),
            x: 100,
            y: 100,
            width: None,
            height: None,
            // Semi-transparent red
            background_argb: 0x80FF_0000,
            text_argb: 0xFFFF_FFFF,
            padding: 20,
            focusable: false,
            touch_modal: false,
            translucent: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    pub pending_policy: PendingPolicy,
}

/// What happens when a request arrives while one of the same kind is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingPolicy {
    /// Displace the pending request; its caller resolves with `RequestSuperseded`.
    #[default]
    Supersede,
    /// Fail the new request with `RequestPending`; the original stays outstanding.
    RejectNew,
}

impl AgentConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: AgentConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling.interval_ms == 0 {
            return Err(ConfigError::Invalid("sampling.interval_ms must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Loads from `$PERFWATCH_CONFIG` when set, defaults otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => {
                debug!("{} not set, using default config", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }
}
