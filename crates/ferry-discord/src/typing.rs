//! Discord typing indicator, refreshed every 8 seconds.
//!
//! A `broadcast_typing` call expires after about 10 seconds and the agent can
//! take minutes, so the indicator is refreshed on a loop for the whole wait.
//! `TypingHandle::stop()` aborts the loop immediately.

use std::sync::Arc;
use std::time::Duration;

use serenity::http::Http;
use serenity::model::id::ChannelId;

/// Handle to a background typing indicator task.
///
/// Call `stop()` once the response is ready to abort the loop.
pub struct TypingHandle(tokio::task::JoinHandle<()>);

impl TypingHandle {
    /// Spawn the typing indicator loop for `channel_id`.
    ///
    /// Broadcasts typing immediately, then every 8 seconds.
    pub fn start(http: Arc<Http>, channel_id: ChannelId) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                let _ = channel_id.broadcast_typing(&http).await;
                tokio::time::sleep(Duration::from_secs(8)).await;
            }
        });
        TypingHandle(handle)
    }

    /// Abort the typing indicator loop.
    pub fn stop(self) {
        self.0.abort();
    }
}
