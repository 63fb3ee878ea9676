use serde::{Deserialize, Serialize};

use crate::config::NotificationContent;

/// Token proving the process is pinned in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeepAliveHandle(pub u64);

/// OS mechanism keeping the process alive while a visible indicator is shown.
pub trait KeepAliveHost: Send + Sync {
    fn acquire(&self, content: &NotificationContent) -> KeepAliveHandle;
    fn release(&self, handle: KeepAliveHandle);
}

/// Best-effort, user-visible confirmations (toasts).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}
