//! Channel allowlist for the Discord adapter.
//!
//! Allow-by-default: an empty `allowed_channels` list means the bot responds
//! in every channel and DM it can see. A non-empty list restricts the bot to
//! exactly those channel IDs.

/// Returns `true` when the bot should respond in the given channel.
pub fn is_allowed(allowed_channels: &[String], channel_id: &str) -> bool {
    if allowed_channels.is_empty() {
        return true;
    }
    allowed_channels.iter().any(|entry| entry == channel_id)
}
