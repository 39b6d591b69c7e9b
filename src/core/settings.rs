use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Upper bound for the per-zone alert cooldown.
pub const MAX_COOLDOWN_MINUTES: u32 = 60;

/// Daily wall-clock window during which alerts are muted.
///
/// Times are stored as "HH:MM" strings, matching the persisted wire format.
/// A window whose start is later than its end spans midnight (22:00-07:00).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    #[serde(default = "default_quiet_start")]
    pub start: String,
    #[serde(default = "default_quiet_end")]
    pub end: String,
    #[serde(default)]
    pub enabled: bool,
}

fn default_quiet_start() -> String {
    "22:00".to_string()
}

fn default_quiet_end() -> String {
    "07:00".to_string()
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            start: default_quiet_start(),
            end: default_quiet_end(),
            enabled: false,
        }
    }
}

/// Parse a wall-clock time in "HH:MM" form.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Alert policy - persisted as JSON under the settings key.
///
/// Every field carries a serde default so a payload written by an older
/// version still deserializes into a fully-populated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    #[serde(default = "default_true")]
    pub enable_voice_alerts: bool,
    #[serde(default = "default_true")]
    pub enable_visual_alerts: bool,
    #[serde(default = "default_true")]
    pub enable_parent_notifications: bool,
    /// Minimum minutes between notifications for the same zone (0-60)
    #[serde(default = "default_cooldown")]
    pub alert_cooldown_minutes: u32,
    #[serde(default)]
    pub quiet_hours: QuietHours,
}

fn default_true() -> bool {
    true
}

fn default_cooldown() -> u32 {
    5
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enable_voice_alerts: true,
            enable_visual_alerts: true,
            enable_parent_notifications: true,
            alert_cooldown_minutes: default_cooldown(),
            quiet_hours: QuietHours::default(),
        }
    }
}

impl AlertSettings {
    /// Check a merged value before it is applied or persisted.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.alert_cooldown_minutes > MAX_COOLDOWN_MINUTES {
            return Err(EngineError::Validation(format!(
                "alert_cooldown_minutes must be between 0 and {}, got {}",
                MAX_COOLDOWN_MINUTES, self.alert_cooldown_minutes
            )));
        }
        for (label, value) in [
            ("quiet_hours.start", &self.quiet_hours.start),
            ("quiet_hours.end", &self.quiet_hours.end),
        ] {
            if parse_clock(value).is_none() {
                return Err(EngineError::Validation(format!(
                    "{} must be a HH:MM time, got {:?}",
                    label, value
                )));
            }
        }
        Ok(())
    }

    /// Merge a patch, returning the candidate value. Validation happens
    /// separately so a rejected merge leaves the original untouched.
    pub fn merged(&self, patch: SettingsPatch) -> AlertSettings {
        AlertSettings {
            enable_voice_alerts: patch.enable_voice_alerts.unwrap_or(self.enable_voice_alerts),
            enable_visual_alerts: patch
                .enable_visual_alerts
                .unwrap_or(self.enable_visual_alerts),
            enable_parent_notifications: patch
                .enable_parent_notifications
                .unwrap_or(self.enable_parent_notifications),
            alert_cooldown_minutes: patch
                .alert_cooldown_minutes
                .unwrap_or(self.alert_cooldown_minutes),
            quiet_hours: patch.quiet_hours.unwrap_or_else(|| self.quiet_hours.clone()),
        }
    }
}

/// Partial settings update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub enable_voice_alerts: Option<bool>,
    pub enable_visual_alerts: Option<bool>,
    pub enable_parent_notifications: Option<bool>,
    pub alert_cooldown_minutes: Option<u32>,
    pub quiet_hours: Option<QuietHours>,
}
