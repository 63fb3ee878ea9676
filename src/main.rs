use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use perfwatch::kernel::ui::UiThread;
use perfwatch::platform::sim::SimulatedHost;
use perfwatch::platform::{SysfsBattery, TracingSink};
use perfwatch::samplers::{BatteryTemperatureSampler, ForegroundAppSampler, MemoryUsageSampler, Sampler};
use perfwatch::{Agent, AgentConfig, PermissionKind};

const HELP: &str = "commands: perm|grant|revoke|return <overlay|usage>, start, stop, overlay, kill-overlay, status, quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let config = AgentConfig::from_env().context("loading config")?;
    tracing::info!("Perfwatch agent booting...");

    // Host: simulated permission/window/keep-alive surfaces, real battery and memory.
    let host = SimulatedHost::new();
    let mut services = host.services();
    services.sink = Arc::new(TracingSink);

    let samplers: Vec<Box<dyn Sampler>> = vec![
        Box::new(BatteryTemperatureSampler::new(Arc::new(SysfsBattery::new()))),
        Box::new(ForegroundAppSampler::with_window(host.clone(), config.sampling.foreground_window_ms)),
        Box::new(MemoryUsageSampler::new()),
    ];

    let ui = UiThread::spawn().context("spawning UI thread")?;
    let agent = Arc::new(Agent::new(&config, services, samplers, ui));

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => break,
            },
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["perm", kind] => {
                let Some(kind) = parse_kind(kind) else { continue };
                let agent = agent.clone();
                tokio::spawn(async move {
                    match agent.request_permission(kind).await {
                        Ok(granted) => tracing::info!("{} permission granted={}", kind, granted),
                        Err(e) => tracing::error!("{} permission request failed: {}", kind, e),
                    }
                });
            }
            ["grant", kind] => {
                if let Some(kind) = parse_kind(kind) {
                    host.grant(kind);
                }
            }
            ["revoke", kind] => {
                if let Some(kind) = parse_kind(kind) {
                    host.revoke(kind);
                }
            }
            ["return", kind] => {
                let Some(kind) = parse_kind(kind) else { continue };
                match host.last_launch(kind) {
                    Some(token) => {
                        agent.deliver_permission_result(token);
                    }
                    None => tracing::warn!("No {} settings screen was opened", kind),
                }
            }
            ["start"] => agent.start_monitoring(),
            ["stop"] => agent.stop_monitoring(),
            ["overlay"] => agent.toggle_overlay(),
            ["kill-overlay"] => host.force_detach_all(),
            ["status"] => println!("{}", serde_json::to_string_pretty(&agent.status())?),
            ["quit"] => break,
            _ => println!("{}", HELP),
        }
    }

    agent.stop_monitoring();
    tracing::info!("Perfwatch agent stopped.");
    Ok(())
}

fn parse_kind(word: &str) -> Option<PermissionKind> {
    match word {
        "overlay" => Some(PermissionKind::OverlayDraw),
        "usage" => Some(PermissionKind::UsageStats),
        other => {
            tracing::warn!("Unknown permission '{}', expected overlay or usage", other);
            None
        }
    }
}
