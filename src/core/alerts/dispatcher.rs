// Best-effort notification dispatch.
//
// Decides which hooks fire for an event that passed the gates, based on the
// current settings, and shields the engine from collaborator failures: every
// hook error is logged and swallowed.

use std::sync::Arc;

use super::channel::{NotificationChannel, RewardLedger};
use crate::core::model::{EventKind, SafeZoneEvent};
use crate::core::settings::AlertSettings;

/// Points credited per qualifying event.
pub const POINTS_PER_EVENT: u32 = 10;

pub struct NotificationDispatcher {
    channel: Arc<dyn NotificationChannel>,
    rewards: Arc<dyn RewardLedger>,
}

impl NotificationDispatcher {
    pub fn new(channel: Arc<dyn NotificationChannel>, rewards: Arc<dyn RewardLedger>) -> Self {
        Self { channel, rewards }
    }

    /// Fire the configured hooks for a qualifying event.
    pub fn dispatch(&self, event: &SafeZoneEvent, settings: &AlertSettings) {
        let message = alert_message(event);

        if settings.enable_voice_alerts {
            if let Err(err) = self.channel.speak(&message) {
                log::warn!("voice alert failed: {}", err);
            }
        }
        if settings.enable_visual_alerts {
            if let Err(err) = self.channel.show_alert(&message) {
                log::warn!("visual alert failed: {}", err);
            }
        }
        if settings.enable_parent_notifications {
            if let Err(err) = self.channel.notify_parent(&message) {
                log::warn!("parent notification failed: {}", err);
            }
        }
        if let Err(err) = self.rewards.add_points(POINTS_PER_EVENT) {
            log::warn!("reward update failed: {}", err);
        }
    }
}

/// Human-readable alert text for a crossing.
fn alert_message(event: &SafeZoneEvent) -> String {
    let name = if event.zone.name.is_empty() {
        event.zone_id.as_str()
    } else {
        event.zone.name.as_str()
    };
    match event.kind {
        EventKind::Enter => format!("Entered safe zone {}", name),
        EventKind::Exit => format!("Left safe zone {}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ChannelError;
    use crate::core::model::{GeoPoint, ZoneSnapshot};
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct RecordingChannel {
        spoken: AtomicU32,
        shown: AtomicU32,
        parent: AtomicU32,
        fail: bool,
    }

    impl NotificationChannel for RecordingChannel {
        fn speak(&self, _text: &str) -> Result<(), ChannelError> {
            self.spoken.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ChannelError::Unavailable("speech engine down".to_string()));
            }
            Ok(())
        }

        fn show_alert(&self, _text: &str) -> Result<(), ChannelError> {
            self.shown.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn notify_parent(&self, _text: &str) -> Result<(), ChannelError> {
            self.parent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingRewards {
        points: AtomicU32,
    }

    impl RewardLedger for RecordingRewards {
        fn add_points(&self, amount: u32) -> Result<(), ChannelError> {
            self.points.fetch_add(amount, Ordering::SeqCst);
            Ok(())
        }
    }

    fn make_event(name: &str) -> SafeZoneEvent {
        SafeZoneEvent {
            zone_id: "zone-1".to_string(),
            kind: EventKind::Enter,
            zone: ZoneSnapshot {
                id: "zone-1".to_string(),
                name: name.to_string(),
                latitude: 48.8,
                longitude: 2.3,
                radius_meters: 100.0,
                is_active: true,
            },
            location: GeoPoint {
                latitude: 48.8,
                longitude: 2.3,
            },
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_all_hooks_fire_with_default_settings() {
        let channel = Arc::new(RecordingChannel::default());
        let rewards = Arc::new(RecordingRewards::default());
        let dispatcher = NotificationDispatcher::new(channel.clone(), rewards.clone());

        dispatcher.dispatch(&make_event("Home"), &AlertSettings::default());

        assert_eq!(channel.spoken.load(Ordering::SeqCst), 1);
        assert_eq!(channel.shown.load(Ordering::SeqCst), 1);
        assert_eq!(channel.parent.load(Ordering::SeqCst), 1);
        assert_eq!(rewards.points.load(Ordering::SeqCst), POINTS_PER_EVENT);
    }

    #[test]
    fn test_disabled_toggles_skip_hooks() {
        let channel = Arc::new(RecordingChannel::default());
        let rewards = Arc::new(RecordingRewards::default());
        let dispatcher = NotificationDispatcher::new(channel.clone(), rewards.clone());

        let mut settings = AlertSettings::default();
        settings.enable_voice_alerts = false;
        settings.enable_parent_notifications = false;

        dispatcher.dispatch(&make_event("Home"), &settings);

        assert_eq!(channel.spoken.load(Ordering::SeqCst), 0);
        assert_eq!(channel.shown.load(Ordering::SeqCst), 1);
        assert_eq!(channel.parent.load(Ordering::SeqCst), 0);
        // Rewards are not tied to a toggle.
        assert_eq!(rewards.points.load(Ordering::SeqCst), POINTS_PER_EVENT);
    }

    #[test]
    fn test_channel_failure_does_not_stop_remaining_hooks() {
        let channel = Arc::new(RecordingChannel {
            fail: true,
            ..RecordingChannel::default()
        });
        let rewards = Arc::new(RecordingRewards::default());
        let dispatcher = NotificationDispatcher::new(channel.clone(), rewards.clone());

        dispatcher.dispatch(&make_event("Home"), &AlertSettings::default());

        assert_eq!(channel.spoken.load(Ordering::SeqCst), 1);
        assert_eq!(channel.shown.load(Ordering::SeqCst), 1);
        assert_eq!(rewards.points.load(Ordering::SeqCst), POINTS_PER_EVENT);
    }

    #[test]
    fn test_message_falls_back_to_zone_id() {
        assert_eq!(alert_message(&make_event("")), "Entered safe zone zone-1");
        assert_eq!(alert_message(&make_event("Home")), "Entered safe zone Home");
    }
}
