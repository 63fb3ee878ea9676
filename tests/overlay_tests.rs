use std::sync::Arc;

use perfwatch::kernel::ui::UiThread;
use perfwatch::platform::sim::{SimulatedHost, WindowOp};
use perfwatch::{Agent, AgentConfig, PermissionKind};

fn agent(host: &Arc<SimulatedHost>) -> Agent {
    Agent::new(
        &AgentConfig::default(),
        host.services(),
        Vec::new(),
        UiThread::spawn().unwrap(),
    )
}

async fn settle(agent: &Agent) {
    agent.overlay().ui().flush().await;
}

#[tokio::test]
async fn test_double_toggle_attaches_then_detaches() {
    let host = SimulatedHost::new();
    host.grant(PermissionKind::OverlayDraw);
    let agent = agent(&host);

    agent.toggle_overlay();
    agent.toggle_overlay();
    settle(&agent).await;

    let window = agent.overlay().window().expect("window built on first toggle");
    assert_eq!(
        host.window_ops(),
        vec![WindowOp::Attach(window.id), WindowOp::Detach(window.id)]
    );
    assert!(!agent.overlay().is_visible());
    assert_eq!(host.notices(), vec!["Overlay Shown", "Overlay Hidden"]);
}

#[tokio::test]
async fn test_window_is_built_once() {
    let host = SimulatedHost::new();
    host.grant(PermissionKind::OverlayDraw);
    let agent = agent(&host);

    agent.toggle_overlay();
    settle(&agent).await;
    let first = agent.overlay().window().unwrap();

    agent.toggle_overlay();
    agent.toggle_overlay();
    settle(&agent).await;
    let again = agent.overlay().window().unwrap();

    assert_eq!(first.id, again.id, "Overlay window must never be rebuilt");
    assert_eq!(first.label, "Overlay Active");
    assert!(agent.overlay().is_visible());
    assert_eq!(host.attached_count(), 1);
}

#[tokio::test]
async fn test_toggle_without_permission_is_refused() {
    let host = SimulatedHost::new();
    let agent = agent(&host);

    agent.toggle_overlay();
    settle(&agent).await;

    assert!(host.window_ops().is_empty(), "No attach without the capability");
    assert!(!agent.overlay().is_visible());
    assert!(agent.overlay().window().is_none());
    assert_eq!(host.notices(), vec!["Overlay permission not granted"]);
}

#[tokio::test]
async fn test_force_detached_window_skips_detach() {
    let host = SimulatedHost::new();
    host.grant(PermissionKind::OverlayDraw);
    let agent = agent(&host);

    agent.toggle_overlay();
    settle(&agent).await;
    assert!(agent.overlay().is_visible());

    // The system pulls the window behind the controller's back.
    host.force_detach_all();

    agent.toggle_overlay();
    settle(&agent).await;

    let window = agent.overlay().window().unwrap();
    assert_eq!(host.window_ops(), vec![WindowOp::Attach(window.id)], "Redundant detach skipped");
    assert!(!agent.overlay().is_visible());

    // And the next toggle shows it again.
    agent.toggle_overlay();
    settle(&agent).await;
    assert!(agent.overlay().is_visible());
    assert_eq!(host.attached_count(), 1);
}

#[tokio::test]
async fn test_attach_failure_leaves_hidden() {
    let host = SimulatedHost::new();
    host.grant(PermissionKind::OverlayDraw);
    host.fail_attach(Some("bad token for window"));
    let agent = agent(&host);

    agent.toggle_overlay();
    settle(&agent).await;

    assert!(!agent.overlay().is_visible());
    let notices = host.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].starts_with("failed to show overlay"));

    // Retry succeeds once the display accepts the window.
    host.fail_attach(None);
    agent.toggle_overlay();
    settle(&agent).await;
    assert!(agent.overlay().is_visible());
}

#[tokio::test]
async fn test_detach_failure_still_hides() {
    let host = SimulatedHost::new();
    host.grant(PermissionKind::OverlayDraw);
    let agent = agent(&host);

    agent.toggle_overlay();
    settle(&agent).await;

    host.fail_detach(Some("window manager busy"));
    agent.toggle_overlay();
    settle(&agent).await;

    assert!(!agent.overlay().is_visible(), "State flips even when detach fails");
    assert!(host
        .notices()
        .last()
        .is_some_and(|n| n.starts_with("failed to hide overlay")));
}

#[tokio::test]
async fn test_toggle_recovers_after_detach_failure() {
    let host = SimulatedHost::new();
    host.grant(PermissionKind::OverlayDraw);
    let agent = agent(&host);

    agent.toggle_overlay();
    settle(&agent).await;

    host.fail_detach(Some("busy"));
    agent.toggle_overlay();
    settle(&agent).await;
    assert!(!agent.overlay().is_visible());
    assert_eq!(host.attached_count(), 1, "Window still on the display");
    host.fail_detach(None);

    // Show adopts the window that is still attached.
    agent.toggle_overlay();
    settle(&agent).await;
    assert!(agent.overlay().is_visible());
    assert_eq!(host.attached_count(), 1);
    assert_eq!(host.notices().last().map(String::as_str), Some("Overlay Shown"));

    // And hide works again.
    agent.toggle_overlay();
    settle(&agent).await;
    assert!(!agent.overlay().is_visible());
    assert_eq!(host.attached_count(), 0);

    let window = agent.overlay().window().unwrap();
    assert_eq!(
        host.window_ops(),
        vec![WindowOp::Attach(window.id), WindowOp::Detach(window.id)],
        "No second attach for a window already on the display"
    );
}

#[tokio::test]
async fn test_toggle_from_ui_thread_runs_inline() {
    let host = SimulatedHost::new();
    host.grant(PermissionKind::OverlayDraw);
    let agent = Arc::new(agent(&host));

    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    let inner = agent.clone();
    agent.overlay().ui().run(move || {
        inner.toggle_overlay();
        // Already applied by the time toggle returns.
        let _ = done_tx.send(inner.overlay().is_visible());
    });

    assert!(done_rx.await.unwrap());
}
