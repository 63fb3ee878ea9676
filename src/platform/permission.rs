use crate::kernel::permission::{CorrelationToken, PermissionKind};

/// Synchronous, side-effect-free query of whether a permission is granted.
pub trait CapabilityAuthority: Send + Sync {
    fn has_capability(&self, kind: PermissionKind) -> bool;
}

/// The settings surface that asks the user for a permission.
pub trait PermissionAuthority: Send + Sync {
    /// Whether a foreground activity exists to host the settings screen.
    fn has_foreground_context(&self) -> bool;

    /// Opens the settings screen for `token.kind` and returns without waiting.
    /// The host later reports back through `PermissionBroker::deliver` with
    /// the same token, or never if the user does not come back.
    fn begin_request(&self, token: &CorrelationToken) -> Result<(), String>;
}
