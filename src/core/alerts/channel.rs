use crate::core::error::ChannelError;

/// Notification sink supplied by the embedder.
///
/// All hooks are fire-and-forget from the engine's point of view: a returned
/// error is logged by the dispatcher and never propagates to callers.
pub trait NotificationChannel: Send + Sync {
    /// Speak a message aloud.
    fn speak(&self, text: &str) -> Result<(), ChannelError>;
    /// Show a visual alert (toast, banner).
    fn show_alert(&self, text: &str) -> Result<(), ChannelError>;
    /// Push a notification to the parent device.
    fn notify_parent(&self, text: &str) -> Result<(), ChannelError>;
}

/// Points sink credited once per qualifying (non-suppressed) event.
pub trait RewardLedger: Send + Sync {
    fn add_points(&self, amount: u32) -> Result<(), ChannelError>;
}
