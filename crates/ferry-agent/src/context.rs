//! Channel-to-context mapping.
//!
//! Each Discord channel gets its own persistent conversation with the agent,
//! keyed by an opaque context id. Mappings live for the process lifetime
//! only; a restart starts every channel on a fresh context.

use dashmap::DashMap;
use uuid::Uuid;

/// In-memory map from channel id to upstream context id.
#[derive(Debug, Default)]
pub struct ContextMap {
    inner: DashMap<String, String>,
}

impl ContextMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context id for `channel_id`, minting and caching a fresh one the
    /// first time the channel is seen.
    pub fn resolve(&self, channel_id: &str) -> String {
        self.inner
            .entry(channel_id.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    /// Overwrite the cached context id for `channel_id`.
    pub fn store(&self, channel_id: &str, context_id: &str) {
        self.inner
            .insert(channel_id.to_string(), context_id.to_string());
    }

    /// Current mapping without creating one.
    pub fn get(&self, channel_id: &str) -> Option<String> {
        self.inner.get(channel_id).map(|v| v.value().clone())
    }

    /// Discard the mapping for `channel_id`. Returns `true` when one existed.
    pub fn reset(&self, channel_id: &str) -> bool {
        self.inner.remove(channel_id).is_some()
    }
}
