use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::cancel::PeriodicTask;
use super::lifecycle::{LifecycleGraph, LifecycleRequest};
use super::sampling::SamplingLoop;
use super::state::SamplingLoopState;
use super::time::{now_millis, SAMPLE_INTERVAL_MS};
use crate::config::{NotificationContent, SamplingConfig};
use crate::platform::{KeepAliveHandle, KeepAliveHost, Notifier};
use crate::samplers::Sampler;

const STARTED_NOTICE: &str = "Performance Monitoring Started";
const STOPPED_NOTICE: &str = "Performance Monitoring Stopped";

struct Session {
    keep_alive: KeepAliveHandle,
    task: PeriodicTask,
}

/// Owns the sampling loop and binds it to the keep-alive lifecycle.
///
/// `start`/`stop` are serialized by the session lock. The loop state and the
/// sampler list each have their own lock, never held across a host call.
pub struct MonitoringService {
    interval: Duration,
    content: NotificationContent,
    keep_alive: Arc<dyn KeepAliveHost>,
    notifier: Arc<dyn Notifier>,
    sampling: Arc<Mutex<SamplingLoop>>,
    state: Arc<Mutex<SamplingLoopState>>,
    session: Mutex<Option<Session>>,
}

impl MonitoringService {
    pub fn new(
        config: &SamplingConfig,
        content: NotificationContent,
        keep_alive: Arc<dyn KeepAliveHost>,
        notifier: Arc<dyn Notifier>,
        sampling: SamplingLoop,
    ) -> Self {
        let interval_ms = if config.interval_ms == 0 {
            warn!("Sampling interval of 0ms, falling back to {}ms", SAMPLE_INTERVAL_MS);
            SAMPLE_INTERVAL_MS
        } else {
            config.interval_ms
        };

        Self {
            interval: Duration::from_millis(interval_ms),
            content,
            keep_alive,
            notifier,
            sampling: Arc::new(Mutex::new(sampling)),
            state: Arc::new(Mutex::new(SamplingLoopState::new(interval_ms))),
            session: Mutex::new(None),
        }
    }

    /// Idle -> Running. Returns false if already running.
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut session = lock(&self.session);

        if !self.flip(LifecycleRequest::Start) {
            debug!("Monitoring already running");
            return false;
        }

        let keep_alive = self.keep_alive.acquire(&self.content);
        self.notifier.notify(STARTED_NOTICE);

        let state = self.state.clone();
        let sampling = self.sampling.clone();
        let task = PeriodicTask::spawn("sampling", self.interval, move || {
            let now = now_millis();
            {
                let mut state = lock(&state);
                if !state.is_running() {
                    return;
                }
                state.last_tick_at_ms = Some(now);
                state.ticks += 1;
            }
            let (mut samplers, sink) = {
                let mut sampling = lock(&sampling);
                (sampling.take_samplers(), sampling.sink())
            };
            let report = SamplingLoop::sample_all(&mut samplers, sink.as_ref(), now);
            lock(&sampling).restore(samplers);
            debug!("Tick: {} emitted, {} failed", report.emitted, report.failed);
        });

        *session = Some(Session { keep_alive, task });
        info!("Monitoring started, interval {:?}", self.interval);
        true
    }

    /// Running -> Idle. Returns false if already idle.
    pub fn stop(&self) -> bool {
        let mut session = lock(&self.session);

        if !self.flip(LifecycleRequest::Stop) {
            debug!("Monitoring already stopped");
            return false;
        }

        if let Some(active) = session.take() {
            active.task.cancel();
            self.keep_alive.release(active.keep_alive);
        }
        self.notifier.notify(STOPPED_NOTICE);
        info!("Monitoring stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).is_running()
    }

    pub fn snapshot(&self) -> SamplingLoopState {
        lock(&self.state).clone()
    }

    pub fn register(&self, sampler: Box<dyn Sampler>) {
        lock(&self.sampling).register(sampler);
    }

    fn flip(&self, request: LifecycleRequest) -> bool {
        let mut state = lock(&self.state);
        match LifecycleGraph::transition(state.phase, request) {
            Some(next) => {
                state.phase = next;
                true
            }
            None => false,
        }
    }
}

impl Drop for MonitoringService {
    fn drop(&mut self) {
        if let Some(active) = lock(&self.session).take() {
            active.task.cancel();
            self.keep_alive.release(active.keep_alive);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
