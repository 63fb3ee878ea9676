//! Host collaborators the core depends on.
//!
//! Each trait is the narrow boundary to one external service: the OS
//! permission system, the keep-alive lifecycle host, the windowing system,
//! the usage-event log, the battery and the log sink. The core never reaches
//! past these traits.

pub mod battery;
pub mod lifecycle;
pub mod permission;
pub mod sim;
pub mod sink;
pub mod usage;
pub mod window;

use std::sync::Arc;

pub use battery::{BatteryStatus, SysfsBattery};
pub use lifecycle::{KeepAliveHandle, KeepAliveHost, Notifier};
pub use permission::{CapabilityAuthority, PermissionAuthority};
pub use sink::{LogSink, TracingSink};
pub use usage::{UsageEvent, UsageEventKind, UsageEventLog};
pub use window::{Gravity, LayoutParams, OverlayWindow, WindowSystem};

/// The host services an agent is wired against, injected once at startup.
#[derive(Clone)]
pub struct HostServices {
    pub capabilities: Arc<dyn CapabilityAuthority>,
    pub permissions: Arc<dyn PermissionAuthority>,
    pub keep_alive: Arc<dyn KeepAliveHost>,
    pub windows: Arc<dyn WindowSystem>,
    pub notifier: Arc<dyn Notifier>,
    pub sink: Arc<dyn LogSink>,
}
