use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageEventKind {
    MoveToForeground,
    MoveToBackground,
    ActivityResumed,
    ActivityPaused,
    Other(u32),
}

impl UsageEventKind {
    /// Event kinds that mark an app as the one in front.
    pub fn brings_to_foreground(self) -> bool {
        matches!(self, UsageEventKind::MoveToForeground | UsageEventKind::ActivityResumed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub kind: UsageEventKind,
    pub app_id: String,
    pub timestamp_ms: u64,
}

/// System log of app usage events.
pub trait UsageEventLog: Send + Sync {
    /// Events with `from <= timestamp < to`, oldest first. Single pass.
    fn query_events(&self, from_ms: u64, to_ms: u64) -> Box<dyn Iterator<Item = UsageEvent> + '_>;
}
