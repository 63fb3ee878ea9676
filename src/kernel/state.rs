use std::sync::Arc;

use super::lifecycle::MonitorPhase;
use crate::platform::{LayoutParams, OverlayWindow};

/// Owned by the monitoring service. Ticks read `phase` at entry.
#[derive(Debug, Clone, Default)]
pub struct SamplingLoopState {
    pub phase: MonitorPhase,
    pub interval_ms: u64,
    pub last_tick_at_ms: Option<u64>,
    pub ticks: u64,
}

impl SamplingLoopState {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == MonitorPhase::Running
    }
}

/// Owned by the overlay controller.
/// Invariant: the window is attached to the display iff `visible`, modulo
/// external force-detach which is reconciled on the next toggle.
#[derive(Debug, Default)]
pub struct OverlayState {
    pub visible: bool,
    /// Built on first toggle, never rebuilt.
    pub surface: Option<Arc<OverlaySurface>>,
}

#[derive(Debug)]
pub struct OverlaySurface {
    pub window: OverlayWindow,
    pub params: LayoutParams,
}
