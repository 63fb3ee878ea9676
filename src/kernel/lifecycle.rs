use serde::{Deserialize, Serialize};

/// Lifecycle of the monitoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MonitorPhase {
    /// No keep-alive token held, no tick scheduled.
    #[default]
    Idle,
    /// Keep-alive token held, ticks scheduled at the sampling interval.
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleRequest {
    Start,
    Stop,
}

pub struct LifecycleGraph;

impl LifecycleGraph {
    /// (Current phase, Request) -> New phase.
    /// Returns None when the request is a no-op in the current phase.
    pub fn transition(current: MonitorPhase, request: LifecycleRequest) -> Option<MonitorPhase> {
        use LifecycleRequest::*;
        use MonitorPhase::*;

        match (current, request) {
            (Idle, Start) => Some(Running),
            (Running, Stop) => Some(Idle),
            // start while Running, stop while Idle
            _ => None,
        }
    }
}
