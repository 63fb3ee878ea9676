//! In-process host that records every interaction.
//!
//! Drives the console binary and the tests. Permission grants, window
//! failures, battery readings and usage events are all switched by hand.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;
use uuid::Uuid;

use super::{
    BatteryStatus, CapabilityAuthority, HostServices, KeepAliveHandle, KeepAliveHost, LayoutParams,
    LogSink, Notifier, OverlayWindow, PermissionAuthority, UsageEvent, UsageEventLog, WindowSystem,
};
use crate::config::NotificationContent;
use crate::error::SamplerError;
use crate::kernel::event::Sample;
use crate::kernel::permission::{CorrelationToken, PermissionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOp {
    Attach(Uuid),
    Detach(Uuid),
}

#[derive(Debug)]
struct SimState {
    granted: HashSet<PermissionKind>,
    foreground_context: bool,
    launch_failure: Option<String>,
    launched: Vec<CorrelationToken>,

    next_handle: u64,
    held: HashSet<KeepAliveHandle>,
    acquisitions: usize,
    releases: usize,

    attached: HashSet<Uuid>,
    window_ops: Vec<WindowOp>,
    attach_failure: Option<String>,
    detach_failure: Option<String>,

    notices: Vec<String>,
    samples: Vec<Sample>,
    battery_tenths: Option<i32>,
    usage_events: Vec<UsageEvent>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            granted: HashSet::new(),
            foreground_context: true,
            launch_failure: None,
            launched: Vec::new(),
            next_handle: 1,
            held: HashSet::new(),
            acquisitions: 0,
            releases: 0,
            attached: HashSet::new(),
            window_ops: Vec::new(),
            attach_failure: None,
            detach_failure: None,
            notices: Vec::new(),
            samples: Vec::new(),
            battery_tenths: Some(300),
            usage_events: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SimulatedHost {
    state: Mutex<SimState>,
}

impl SimulatedHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every host service backed by this simulator.
    pub fn services(self: &Arc<Self>) -> HostServices {
        HostServices {
            capabilities: self.clone(),
            permissions: self.clone(),
            keep_alive: self.clone(),
            windows: self.clone(),
            notifier: self.clone(),
            sink: self.clone(),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // --- permissions ---

    pub fn grant(&self, kind: PermissionKind) {
        self.state().granted.insert(kind);
    }

    pub fn revoke(&self, kind: PermissionKind) {
        self.state().granted.remove(&kind);
    }

    pub fn set_foreground_context(&self, available: bool) {
        self.state().foreground_context = available;
    }

    pub fn fail_launches(&self, reason: Option<&str>) {
        self.state().launch_failure = reason.map(str::to_string);
    }

    pub fn launched(&self) -> Vec<CorrelationToken> {
        self.state().launched.clone()
    }

    pub fn last_launch(&self, kind: PermissionKind) -> Option<CorrelationToken> {
        self.state().launched.iter().rev().find(|t| t.kind == kind).copied()
    }

    // --- keep-alive ---

    pub fn acquisitions(&self) -> usize {
        self.state().acquisitions
    }

    pub fn releases(&self) -> usize {
        self.state().releases
    }

    pub fn held_keep_alives(&self) -> usize {
        self.state().held.len()
    }

    // --- windows ---

    pub fn window_ops(&self) -> Vec<WindowOp> {
        self.state().window_ops.clone()
    }

    pub fn attached_count(&self) -> usize {
        self.state().attached.len()
    }

    /// The system removes every overlay window without telling its owner.
    pub fn force_detach_all(&self) {
        self.state().attached.clear();
    }

    pub fn fail_attach(&self, reason: Option<&str>) {
        self.state().attach_failure = reason.map(str::to_string);
    }

    pub fn fail_detach(&self, reason: Option<&str>) {
        self.state().detach_failure = reason.map(str::to_string);
    }

    // --- notices, samples, sources ---

    pub fn notices(&self) -> Vec<String> {
        self.state().notices.clone()
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.state().samples.clone()
    }

    pub fn samples_for(&self, metric: &str) -> Vec<Sample> {
        self.state().samples.iter().filter(|s| s.metric == metric).cloned().collect()
    }

    pub fn set_battery_tenths(&self, tenths: Option<i32>) {
        self.state().battery_tenths = tenths;
    }

    pub fn push_usage_event(&self, event: UsageEvent) {
        self.state().usage_events.push(event);
    }
}

impl CapabilityAuthority for SimulatedHost {
    fn has_capability(&self, kind: PermissionKind) -> bool {
        self.state().granted.contains(&kind)
    }
}

impl PermissionAuthority for SimulatedHost {
    fn has_foreground_context(&self) -> bool {
        self.state().foreground_context
    }

    fn begin_request(&self, token: &CorrelationToken) -> Result<(), String> {
        let mut state = self.state();
        if let Some(reason) = &state.launch_failure {
            return Err(reason.clone());
        }
        state.launched.push(*token);
        Ok(())
    }
}

impl KeepAliveHost for SimulatedHost {
    fn acquire(&self, content: &NotificationContent) -> KeepAliveHandle {
        let mut state = self.state();
        let handle = KeepAliveHandle(state.next_handle);
        state.next_handle += 1;
        state.held.insert(handle);
        state.acquisitions += 1;
        info!(target: "perfwatch::host", "Foreground notification posted: {}", content.title);
        handle
    }

    fn release(&self, handle: KeepAliveHandle) {
        let mut state = self.state();
        state.held.remove(&handle);
        state.releases += 1;
    }
}

impl WindowSystem for SimulatedHost {
    fn attach(&self, window: &OverlayWindow, _params: &LayoutParams) -> Result<(), String> {
        let mut state = self.state();
        if let Some(reason) = &state.attach_failure {
            return Err(reason.clone());
        }
        if !state.attached.insert(window.id) {
            return Err("window already attached".to_string());
        }
        state.window_ops.push(WindowOp::Attach(window.id));
        Ok(())
    }

    fn detach(&self, window: &OverlayWindow) -> Result<(), String> {
        let mut state = self.state();
        if let Some(reason) = &state.detach_failure {
            return Err(reason.clone());
        }
        if !state.attached.remove(&window.id) {
            return Err("window not attached".to_string());
        }
        state.window_ops.push(WindowOp::Detach(window.id));
        Ok(())
    }

    fn is_attached(&self, window: &OverlayWindow) -> bool {
        self.state().attached.contains(&window.id)
    }
}

impl Notifier for SimulatedHost {
    fn notify(&self, message: &str) {
        info!(target: "perfwatch::notice", "{}", message);
        self.state().notices.push(message.to_string());
    }
}

impl LogSink for SimulatedHost {
    fn emit(&self, sample: Sample) {
        self.state().samples.push(sample);
    }
}

impl BatteryStatus for SimulatedHost {
    fn temperature_tenths(&self) -> Result<i32, SamplerError> {
        self.state()
            .battery_tenths
            .ok_or_else(|| SamplerError::Unavailable("could not get battery status".to_string()))
    }
}

impl UsageEventLog for SimulatedHost {
    fn query_events(&self, from_ms: u64, to_ms: u64) -> Box<dyn Iterator<Item = UsageEvent> + '_> {
        let events: Vec<UsageEvent> = self
            .state()
            .usage_events
            .iter()
            .filter(|e| e.timestamp_ms >= from_ms && e.timestamp_ms < to_ms)
            .cloned()
            .collect();
        Box::new(events.into_iter())
    }
}
