use std::sync::{Arc, Mutex};
use std::time::Duration;

use perfwatch::error::SamplerError;
use perfwatch::kernel::event::{MetricValue, Sample};
use perfwatch::kernel::time::now_millis;
use perfwatch::kernel::ui::UiThread;
use perfwatch::platform::sim::SimulatedHost;
use perfwatch::platform::{UsageEvent, UsageEventKind};
use perfwatch::samplers::battery::BATTERY_TEMPERATURE;
use perfwatch::samplers::foreground::FOREGROUND_APP;
use perfwatch::samplers::{BatteryTemperatureSampler, ForegroundAppSampler, Sampler};
use perfwatch::{Agent, AgentConfig};
use tokio::time::sleep;

fn agent(host: &Arc<SimulatedHost>) -> Agent {
    let samplers: Vec<Box<dyn Sampler>> = vec![
        Box::new(BatteryTemperatureSampler::new(host.clone())),
        Box::new(ForegroundAppSampler::new(host.clone())),
    ];
    Agent::new(
        &AgentConfig::default(),
        host.services(),
        samplers,
        UiThread::spawn().unwrap(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_double_start_acquires_once() {
    let host = SimulatedHost::new();
    let agent = agent(&host);

    agent.start_monitoring();
    agent.start_monitoring();

    assert!(agent.status().monitoring);
    assert_eq!(host.acquisitions(), 1, "Keep-alive must be acquired exactly once");
    assert_eq!(host.held_keep_alives(), 1);
    assert_eq!(
        host.notices().iter().filter(|n| *n == "Performance Monitoring Started").count(),
        1
    );

    // One loop, not two: a single tick yields one sample per sampler.
    sleep(Duration::from_millis(1)).await;
    assert_eq!(host.samples().len(), 2);
    assert_eq!(agent.status().ticks, 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_first_tick_skips_body() {
    let host = SimulatedHost::new();
    let agent = agent(&host);

    // The first tick is scheduled but the test task has not yielded yet.
    agent.start_monitoring();
    agent.stop_monitoring();

    sleep(Duration::from_secs(20)).await;

    assert!(host.samples().is_empty(), "Cancelled tick must not sample");
    assert_eq!(agent.status().ticks, 0);
    assert_eq!(host.releases(), 1);
    assert_eq!(host.held_keep_alives(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_every_interval_until_stopped() {
    let host = SimulatedHost::new();
    let agent = agent(&host);

    agent.start_monitoring();
    sleep(Duration::from_millis(1)).await;
    assert_eq!(host.samples().len(), 2, "First tick runs with zero delay");

    sleep(Duration::from_millis(5_000)).await;
    assert_eq!(host.samples().len(), 4);
    assert_eq!(agent.status().ticks, 2);
    assert!(agent.status().last_tick_at_ms.is_some());

    agent.stop_monitoring();
    sleep(Duration::from_secs(60)).await;
    assert_eq!(host.samples().len(), 4, "No tick after stop");
    assert!(!agent.status().monitoring);
}

#[tokio::test(start_paused = true)]
async fn test_failing_sampler_does_not_block_others() {
    let host = SimulatedHost::new();
    host.set_battery_tenths(None);
    let agent = agent(&host);

    agent.start_monitoring();
    sleep(Duration::from_millis(1)).await;

    assert!(host.samples_for(BATTERY_TEMPERATURE).is_empty());
    assert_eq!(host.samples_for(FOREGROUND_APP).len(), 1, "Foreground app still sampled");

    // Next tick is still scheduled.
    sleep(Duration::from_millis(5_000)).await;
    assert_eq!(host.samples_for(FOREGROUND_APP).len(), 2);

    // Battery recovers on a later tick.
    host.set_battery_tenths(Some(412));
    sleep(Duration::from_millis(5_000)).await;
    let battery = host.samples_for(BATTERY_TEMPERATURE);
    assert_eq!(battery.len(), 1);
    assert_eq!(battery[0].value, MetricValue::Number(41.2));

    agent.stop_monitoring();
}

#[tokio::test(start_paused = true)]
async fn test_foreground_sample_reports_recent_app() {
    let host = SimulatedHost::new();
    host.push_usage_event(UsageEvent {
        kind: UsageEventKind::MoveToForeground,
        app_id: "com.example.game".to_string(),
        timestamp_ms: now_millis().saturating_sub(1_000),
    });
    let agent = agent(&host);

    agent.start_monitoring();
    sleep(Duration::from_millis(1)).await;
    agent.stop_monitoring();

    let foreground = host.samples_for(FOREGROUND_APP);
    assert_eq!(foreground.len(), 1);
    assert_eq!(foreground[0].value, MetricValue::Text("com.example.game".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_stop_when_idle_is_noop() {
    let host = SimulatedHost::new();
    let agent = agent(&host);

    agent.stop_monitoring();

    assert_eq!(host.releases(), 0);
    assert!(host.notices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop() {
    let host = SimulatedHost::new();
    let agent = agent(&host);

    agent.start_monitoring();
    sleep(Duration::from_millis(1)).await;
    agent.stop_monitoring();
    agent.start_monitoring();
    sleep(Duration::from_millis(1)).await;

    assert!(agent.status().monitoring);
    assert_eq!(host.acquisitions(), 2);
    assert_eq!(host.held_keep_alives(), 1);
    assert_eq!(host.samples().len(), 4);

    agent.stop_monitoring();
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_falls_back_to_default() {
    let host = SimulatedHost::new();
    let mut config = AgentConfig::default();
    config.sampling.interval_ms = 0;
    let samplers: Vec<Box<dyn Sampler>> = vec![Box::new(ForegroundAppSampler::new(host.clone()))];
    let agent = Agent::new(&config, host.services(), samplers, UiThread::spawn().unwrap());

    agent.start_monitoring();
    sleep(Duration::from_millis(1)).await;
    assert_eq!(agent.status().ticks, 1, "Loop must be alive after start");

    sleep(Duration::from_millis(5_000)).await;
    assert_eq!(agent.status().ticks, 2);
    assert_eq!(host.samples_for(FOREGROUND_APP).len(), 2);

    agent.stop_monitoring();
}

struct Constant(&'static str);

impl Sampler for Constant {
    fn name(&self) -> &str {
        self.0
    }

    fn sample(&mut self, now_ms: u64) -> Result<Sample, SamplerError> {
        Ok(Sample::new(self.0, MetricValue::Number(1.0), now_ms))
    }
}

/// Registers a `late` sampler on the agent the first time it is sampled.
struct Registrar(Arc<Mutex<Option<Arc<Agent>>>>);

impl Sampler for Registrar {
    fn name(&self) -> &str {
        "registrar"
    }

    fn sample(&mut self, now_ms: u64) -> Result<Sample, SamplerError> {
        if let Some(agent) = self.0.lock().unwrap().take() {
            agent.monitoring().register(Box::new(Constant("late")));
        }
        Ok(Sample::new("registrar", MetricValue::Missing, now_ms))
    }
}

#[tokio::test(start_paused = true)]
async fn test_register_during_tick_does_not_block() {
    let host = SimulatedHost::new();
    let slot = Arc::new(Mutex::new(None));
    let samplers: Vec<Box<dyn Sampler>> = vec![Box::new(Registrar(slot.clone()))];
    let agent = Arc::new(Agent::new(
        &AgentConfig::default(),
        host.services(),
        samplers,
        UiThread::spawn().unwrap(),
    ));
    *slot.lock().unwrap() = Some(agent.clone());

    agent.start_monitoring();
    sleep(Duration::from_millis(1)).await;
    assert_eq!(agent.status().ticks, 1);
    assert!(host.samples_for("late").is_empty(), "Registered after this tick's batch");

    sleep(Duration::from_millis(5_000)).await;
    assert_eq!(host.samples_for("registrar").len(), 2);
    assert_eq!(host.samples_for("late").len(), 1, "Picked up on the next tick");

    agent.stop_monitoring();
}
