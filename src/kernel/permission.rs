//! Permission negotiation.
//!
//! A request is fire-and-forget towards the host's settings surface; the
//! result arrives later on an arbitrary callback carrying the same
//! correlation token. The broker keeps at most one pending completion per
//! kind and re-checks the capability itself when the result arrives, since
//! the user may leave the settings screen without granting anything.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PendingPolicy;
use crate::error::AgentError;
use crate::platform::{CapabilityAuthority, PermissionAuthority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKind {
    OverlayDraw,
    UsageStats,
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionKind::OverlayDraw => f.write_str("overlay-draw"),
            PermissionKind::UsageStats => f.write_str("usage-stats"),
        }
    }
}

/// Links a launched settings screen to its eventual result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationToken {
    pub kind: PermissionKind,
    pub id: Uuid,
}

impl CorrelationToken {
    fn new(kind: PermissionKind) -> Self {
        Self {
            kind,
            id: Uuid::new_v4(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionResult {
    pub kind: PermissionKind,
    pub granted: bool,
}

type Completion = oneshot::Sender<Result<PermissionResult, AgentError>>;

struct PendingSlot {
    token: CorrelationToken,
    completion: Completion,
}

/// Outcome of admitting a request.
#[derive(Debug)]
pub enum Admission {
    /// Already granted; the settings surface was not opened.
    Granted,
    Pending(PendingPermission),
}

/// A launched request waiting for its result delivery.
#[derive(Debug)]
pub struct PendingPermission {
    token: CorrelationToken,
    rx: oneshot::Receiver<Result<PermissionResult, AgentError>>,
}

impl PendingPermission {
    pub fn token(&self) -> CorrelationToken {
        self.token
    }

    pub async fn wait(self) -> Result<bool, AgentError> {
        match self.rx.await {
            Ok(result) => result.map(|r| r.granted),
            Err(_) => Err(AgentError::RequestAbandoned(self.token.kind)),
        }
    }
}

pub struct PermissionBroker {
    capabilities: Arc<dyn CapabilityAuthority>,
    authority: Arc<dyn PermissionAuthority>,
    policy: PendingPolicy,
    pending: Mutex<HashMap<PermissionKind, PendingSlot>>,
}

impl PermissionBroker {
    pub fn new(
        capabilities: Arc<dyn CapabilityAuthority>,
        authority: Arc<dyn PermissionAuthority>,
        policy: PendingPolicy,
    ) -> Self {
        Self {
            capabilities,
            authority,
            policy,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Requests `kind` and waits for the user's answer.
    pub async fn request(&self, kind: PermissionKind) -> Result<bool, AgentError> {
        match self.begin(kind)? {
            Admission::Granted => Ok(true),
            Admission::Pending(pending) => pending.wait().await,
        }
    }

    /// Admits a request without waiting on the user.
    pub fn begin(&self, kind: PermissionKind) -> Result<Admission, AgentError> {
        if self.capabilities.has_capability(kind) {
            debug!("{} already granted", kind);
            return Ok(Admission::Granted);
        }

        if !self.authority.has_foreground_context() {
            warn!("Cannot request {}: no foreground activity", kind);
            return Err(AgentError::ActivityUnavailable);
        }

        let token = CorrelationToken::new(kind);
        let (tx, rx) = oneshot::channel();

        let displaced = {
            let mut pending = self.slots();
            if pending.contains_key(&kind) && self.policy == PendingPolicy::RejectNew {
                return Err(AgentError::RequestPending(kind));
            }
            pending.insert(kind, PendingSlot { token, completion: tx })
        };

        if let Err(reason) = self.authority.begin_request(&token) {
            warn!("Could not open {} settings: {}", kind, reason);
            // The earlier request keeps its slot unless a newer one took it meanwhile.
            let displaced = {
                let mut pending = self.slots();
                if pending.get(&kind).is_some_and(|slot| slot.token == token) {
                    pending.remove(&kind);
                    if let Some(previous) = displaced {
                        debug!("Restoring pending {} request {}", kind, previous.token.id);
                        pending.insert(kind, previous);
                    }
                    None
                } else {
                    displaced
                }
            };
            Self::supersede(kind, displaced);
            return Err(AgentError::AuthorityUnavailable(reason));
        }

        Self::supersede(kind, displaced);
        info!("Opened {} settings, awaiting result {}", kind, token.id);
        Ok(Admission::Pending(PendingPermission { token, rx }))
    }

    fn supersede(kind: PermissionKind, displaced: Option<PendingSlot>) {
        if let Some(stale) = displaced {
            warn!("Superseding pending {} request {}", kind, stale.token.id);
            let _ = stale.completion.send(Err(AgentError::RequestSuperseded(kind)));
        }
    }

    /// Result callback from the settings surface.
    /// Returns false for stale or duplicate deliveries, which are ignored.
    pub fn deliver(&self, token: CorrelationToken) -> bool {
        let slot = {
            let mut pending = self.slots();
            let matches = pending.get(&token.kind).is_some_and(|slot| slot.token == token);
            if matches {
                pending.remove(&token.kind)
            } else {
                None
            }
        };

        let Some(slot) = slot else {
            debug!("Ignoring stale {} result {}", token.kind, token.id);
            return false;
        };

        // The delivered payload is not trusted; ask the platform again.
        let granted = self.capabilities.has_capability(token.kind);
        info!("{} permission result: granted={}", token.kind, granted);
        let _ = slot.completion.send(Ok(PermissionResult {
            kind: token.kind,
            granted,
        }));
        true
    }

    pub fn is_pending(&self, kind: PermissionKind) -> bool {
        self.slots().contains_key(&kind)
    }

    pub fn pending_kinds(&self) -> Vec<PermissionKind> {
        let mut kinds: Vec<_> = self.slots().keys().copied().collect();
        kinds.sort_by_key(|k| *k as u8);
        kinds
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<PermissionKind, PendingSlot>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
