use std::sync::Arc;

use serde::Serialize;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::kernel::overlay::OverlayController;
use crate::kernel::permission::{CorrelationToken, PermissionBroker, PermissionKind};
use crate::kernel::sampling::SamplingLoop;
use crate::kernel::service::MonitoringService;
use crate::kernel::ui::UiThread;
use crate::platform::HostServices;
use crate::samplers::Sampler;

/// Point-in-time view for the control surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStatus {
    pub monitoring: bool,
    pub ticks: u64,
    pub last_tick_at_ms: Option<u64>,
    pub overlay_visible: bool,
    pub pending: Vec<PermissionKind>,
}

/// The agent: one broker, one monitoring service, one overlay, built once
/// and handed to whatever drives it.
pub struct Agent {
    broker: Arc<PermissionBroker>,
    monitoring: MonitoringService,
    overlay: OverlayController,
}

impl Agent {
    pub fn new(
        config: &AgentConfig,
        host: HostServices,
        samplers: Vec<Box<dyn Sampler>>,
        ui: UiThread,
    ) -> Self {
        let broker = PermissionBroker::new(
            host.capabilities.clone(),
            host.permissions.clone(),
            config.permissions.pending_policy,
        );

        let monitoring = MonitoringService::new(
            &config.sampling,
            config.keep_alive.clone(),
            host.keep_alive.clone(),
            host.notifier.clone(),
            SamplingLoop::with_samplers(host.sink.clone(), samplers),
        );

        let overlay = OverlayController::new(
            host.capabilities,
            host.windows,
            host.notifier,
            config.overlay.clone(),
            ui,
        );

        Self {
            broker: Arc::new(broker),
            monitoring,
            overlay,
        }
    }

    pub async fn request_permission(&self, kind: PermissionKind) -> Result<bool, AgentError> {
        self.broker.request(kind).await
    }

    /// Result callback from the host's settings surface.
    pub fn deliver_permission_result(&self, token: CorrelationToken) -> bool {
        self.broker.deliver(token)
    }

    pub fn start_monitoring(&self) {
        self.monitoring.start();
    }

    pub fn stop_monitoring(&self) {
        self.monitoring.stop();
    }

    pub fn toggle_overlay(&self) {
        self.overlay.toggle();
    }

    pub fn permissions(&self) -> &Arc<PermissionBroker> {
        &self.broker
    }

    pub fn monitoring(&self) -> &MonitoringService {
        &self.monitoring
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn status(&self) -> AgentStatus {
        let loop_state = self.monitoring.snapshot();
        AgentStatus {
            monitoring: loop_state.is_running(),
            ticks: loop_state.ticks,
            last_tick_at_ms: loop_state.last_tick_at_ms,
            overlay_visible: self.overlay.is_visible(),
            pending: self.broker.pending_kinds(),
        }
    }
}
